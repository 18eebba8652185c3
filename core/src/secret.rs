//! Authentication context bound to requests by `locking`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

const USER_ID_COOKIE: &str = "ds_user_id";
const SESSION_COOKIE: &str = "sessionid";
const CSRF_COOKIE: &str = "csrftoken";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Session cookies for an authenticated account.
///
/// Storage is the caller's concern; the type serializes so any credential
/// store can persist it as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSecret")]
pub struct Secret {
    cookies: Vec<Cookie>,
}

#[derive(Deserialize)]
struct StoredSecret {
    cookies: Vec<Cookie>,
}

impl TryFrom<StoredSecret> for Secret {
    type Error = ApiError;

    fn try_from(stored: StoredSecret) -> Result<Self> {
        Self::from_cookies(stored.cookies.into_iter().map(|c| (c.name, c.value)))
    }
}

impl Secret {
    /// Builds a secret from `(name, value)` cookie pairs. `ds_user_id` and
    /// `sessionid` must be present and non-empty.
    pub fn from_cookies<I, K, V>(cookies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cookies: Vec<Cookie> = cookies
            .into_iter()
            .map(|(name, value)| Cookie {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        for cookie in &cookies {
            if cookie.name.contains('=') || has_separator(&cookie.name) || has_separator(&cookie.value) {
                return Err(ApiError::InvalidSecret(format!(
                    "cookie `{}` contains a reserved character",
                    cookie.name.escape_debug()
                )));
            }
        }
        let secret = Self { cookies };
        for required in [USER_ID_COOKIE, SESSION_COOKIE] {
            if secret.cookie(required).map_or(true, str::is_empty) {
                return Err(ApiError::InvalidSecret(format!("missing `{required}` cookie")));
            }
        }
        Ok(secret)
    }

    /// The logged-in user's primary key.
    pub fn identifier(&self) -> &str {
        self.cookie(USER_ID_COOKIE).unwrap_or_default()
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Headers injected into every locked request.
    pub fn header_fields(&self) -> Vec<(String, String)> {
        let cookie = self
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        let mut headers = vec![("Cookie".to_string(), cookie)];
        if let Some(token) = self.cookie(CSRF_COOKIE) {
            headers.push(("X-CSRFToken".to_string(), token.to_string()));
        }
        headers
    }
}

/// Names and values are joined verbatim into the `Cookie` header, so a `;`
/// or a control character (CR/LF included) would split or forge a pair.
/// `=` is only reserved in names; values may carry it (base64 padding).
fn has_separator(s: &str) -> bool {
    s.chars().any(|c| c == ';' || c.is_control())
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.cookies.iter().map(|c| c.name.as_str()).collect();
        f.debug_struct("Secret")
            .field("identifier", &self.identifier())
            .field("cookies", &names)
            .finish()
    }
}
