//! Immutable endpoint descriptor.
//!
//! # Design
//! `Endpoint` accumulates path components, query pairs, headers and a method.
//! Every builder method takes `&self` and returns a new value, so a partially
//! built endpoint can be shared and extended from several call sites without
//! one extension leaking into another.

use url::form_urlencoded;

use crate::config::{ApiConfig, DEFAULT_BASE_URL};
use crate::http::HttpMethod;
use crate::request::{Disposable, Page, Paginated};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    components: Vec<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    method: HttpMethod,
}

impl Endpoint {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            components: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            method: HttpMethod::Get,
        }
    }

    /// The versioned API root every catalog entry starts from.
    pub fn version1() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Appends one path component. Leading slashes are dropped; a trailing
    /// slash is kept, since mutating endpoints are trailing-slash sensitive.
    pub fn appending_path(&self, component: &str) -> Self {
        let component = component.trim_start_matches('/');
        let mut next = self.clone();
        if !component.is_empty() {
            next.components.push(component.to_string());
        }
        next
    }

    pub fn appending_query(&self, key: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.query.push((key.to_string(), value.to_string()));
        next
    }

    /// Adds a header, replacing the value in place if `key` is already set
    /// (compared case-insensitively).
    pub fn appending_header(&self, key: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.set_header(key, value);
        next
    }

    pub fn appending_headers<I, K, V>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut next = self.clone();
        for (key, value) in headers {
            next.set_header(key.as_ref(), value.as_ref());
        }
        next
    }

    pub fn appending_default_header(&self) -> Self {
        self.appending_headers(ApiConfig::default().default_headers())
    }

    pub fn replacing_method(&self, method: HttpMethod) -> Self {
        let mut next = self.clone();
        next.method = method;
        next
    }

    pub fn replacing_base(&self, base_url: &str) -> Self {
        let mut next = self.clone();
        next.base_url = base_url.trim_end_matches('/').to_string();
        next
    }

    /// Re-targets the endpoint at `config`'s host and identity headers.
    pub fn configured(&self, config: &ApiConfig) -> Self {
        self.replacing_base(&config.base_url)
            .appending_headers(config.default_headers())
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The path relative to the base, always starting with `/`.
    pub fn path(&self) -> String {
        format!("/{}", self.components.join("/"))
    }

    /// The absolute URL including the encoded query string.
    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.base_url, self.path());
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Finalizes the endpoint for a single execution decoding into `T`.
    pub fn prepare<T>(&self) -> Disposable<T> {
        Disposable::new(self.clone())
    }

    /// Finalizes the endpoint for cursor-driven pagination, starting at
    /// `cursor` (`None` for the first page).
    pub fn paginating<T: Page>(&self, cursor: Option<String>) -> Paginated<T> {
        Paginated::new(self.clone(), cursor)
    }

    fn set_header(&mut self, key: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }
}
