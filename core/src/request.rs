//! Finalized requests: single-shot `Disposable` and cursor-driven `Paginated`.
//!
//! # Design
//! Both wrap an immutable `Endpoint` plus an optional `Secret`. Rendering
//! (`request`) and decoding (`parse`) are separate steps so the caller can
//! run the round-trip however it likes; `execute` and `pages` glue the two
//! together through an [`Executor`]. Locking is checked when a request is
//! rendered: an unlocked request never reaches the executor.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::http::{Executor, HttpRequest, HttpResponse};
use crate::secret::Secret;

/// Query parameter carrying the pagination cursor.
pub const CURSOR_QUERY: &str = "max_id";

/// A decoded page that may point at the next one.
pub trait Page {
    /// The cursor for the following page, or `None` on the last page.
    /// Numeric cursors come back as their decimal text; empty ones are `None`.
    fn next_cursor(&self) -> Option<Cow<'_, str>>;
}

/// An endpoint finalized for one execution, decoding into `T`.
pub struct Disposable<T> {
    endpoint: Endpoint,
    secret: Option<Secret>,
    _output: PhantomData<fn() -> T>,
}

impl<T> Disposable<T> {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            secret: None,
            _output: PhantomData,
        }
    }

    /// Binds `secret`; required before the request can be rendered.
    pub fn locking(&self, secret: &Secret) -> Self {
        Self {
            secret: Some(secret.clone()),
            ..self.clone()
        }
    }

    pub fn configured(&self, config: &ApiConfig) -> Self {
        Self {
            endpoint: self.endpoint.configured(config),
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_locked(&self) -> bool {
        self.secret.is_some()
    }

    pub fn request(&self) -> Result<HttpRequest> {
        render(&self.endpoint, self.secret.as_ref())
    }
}

impl<T: DeserializeOwned> Disposable<T> {
    pub fn parse(&self, response: HttpResponse) -> Result<T> {
        decode(response)
    }

    pub fn execute<E: Executor>(&self, executor: &E) -> Result<T> {
        let request = self.request()?;
        self.parse(dispatch(executor, &request)?)
    }
}

impl<T> Clone for Disposable<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            secret: self.secret.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Disposable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("endpoint", &self.endpoint)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// An endpoint finalized for repeated execution, one page per cursor.
pub struct Paginated<T> {
    endpoint: Endpoint,
    cursor: Option<String>,
    secret: Option<Secret>,
    _output: PhantomData<fn() -> T>,
}

impl<T: Page> Paginated<T> {
    pub(crate) fn new(endpoint: Endpoint, cursor: Option<String>) -> Self {
        Self {
            endpoint,
            cursor,
            secret: None,
            _output: PhantomData,
        }
    }

    pub fn locking(&self, secret: &Secret) -> Self {
        Self {
            secret: Some(secret.clone()),
            ..self.clone()
        }
    }

    pub fn configured(&self, config: &ApiConfig) -> Self {
        Self {
            endpoint: self.endpoint.configured(config),
            ..self.clone()
        }
    }

    /// The same request, restarted from `cursor`.
    pub fn starting_at(&self, cursor: Option<String>) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The cursor the first page is requested with.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.secret.is_some()
    }

    /// Renders the first page's request.
    pub fn request(&self) -> Result<HttpRequest> {
        self.request_for(self.cursor())
    }

    /// Renders the request for the page at `cursor`.
    pub fn request_for(&self, cursor: Option<&str>) -> Result<HttpRequest> {
        match cursor {
            Some(cursor) => render(
                &self.endpoint.appending_query(CURSOR_QUERY, cursor),
                self.secret.as_ref(),
            ),
            None => render(&self.endpoint, self.secret.as_ref()),
        }
    }
}

impl<T: Page + DeserializeOwned> Paginated<T> {
    pub fn parse(&self, response: HttpResponse) -> Result<T> {
        decode(response)
    }

    /// Lazily walks pages starting from the stored cursor.
    ///
    /// Pages are fetched one at a time as the iterator is advanced. The
    /// sequence ends after a page without a next cursor, or right after the
    /// first error.
    pub fn pages<'a, E: Executor>(&'a self, executor: &'a E) -> Pages<'a, T, E> {
        Pages {
            paginated: self,
            executor,
            next: Some(self.cursor.clone()),
        }
    }
}

impl<T> Clone for Paginated<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            cursor: self.cursor.clone(),
            secret: self.secret.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("endpoint", &self.endpoint)
            .field("cursor", &self.cursor)
            .field("locked", &self.secret.is_some())
            .finish()
    }
}

/// Iterator returned by [`Paginated::pages`].
pub struct Pages<'a, T, E> {
    paginated: &'a Paginated<T>,
    executor: &'a E,
    // `None` once the sequence is exhausted; `Some(None)` requests the first page.
    next: Option<Option<String>>,
}

impl<T, E> Iterator for Pages<'_, T, E>
where
    T: Page + DeserializeOwned,
    E: Executor,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.next.take()?;
        let page = self
            .paginated
            .request_for(cursor.as_deref())
            .and_then(|request| dispatch(self.executor, &request))
            .and_then(|response| self.paginated.parse(response));

        let page = match page {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(cursor = ?cursor, error = %err, "pagination aborted");
                return Some(Err(err));
            }
        };

        match page.next_cursor() {
            Some(next) if cursor.as_deref() == Some(next.as_ref()) => {
                tracing::debug!(cursor = %next, "cursor repeated, stopping pagination");
            }
            Some(next) => {
                tracing::debug!(cursor = %next, "advancing to next page");
                self.next = Some(Some(next.into_owned()));
            }
            None => tracing::debug!("last page reached"),
        }
        Some(Ok(page))
    }
}

fn render(endpoint: &Endpoint, secret: Option<&Secret>) -> Result<HttpRequest> {
    let secret = secret.ok_or_else(|| {
        tracing::warn!(url = %endpoint.url(), "request is not locked");
        ApiError::MissingCredential
    })?;

    let mut headers = endpoint.headers().to_vec();
    headers.extend(secret.header_fields());

    let request = HttpRequest {
        method: endpoint.method(),
        url: endpoint.url(),
        headers,
        body: None,
    };
    tracing::debug!(method = %request.method, url = %request.url, "rendered request");
    Ok(request)
}

fn dispatch<E: Executor>(executor: &E, request: &HttpRequest) -> Result<HttpResponse> {
    executor
        .execute(request)
        .map_err(|e| ApiError::Transport(Box::new(e)))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<()> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    check_status(&response)?;
    let value: Value = serde_json::from_str(&response.body)?;
    if value.get("status").and_then(Value::as_str) == Some("fail") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown failure")
            .to_string();
        return Err(ApiError::Rejected { message });
    }
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "response did not match the expected shape");
        ApiError::from(e)
    })
}
