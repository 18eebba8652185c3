//! Client identity and host configuration.

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://i.instagram.com/api/v1";
pub const DEFAULT_USER_AGENT: &str = "Instagram 160.1.0.31.120 Android (29/10; 408dpi; 1080x2038; Google/google; Pixel 3; blueline; blueline; en_US; 246979827)";
pub const DEFAULT_APP_ID: &str = "567067343352427";
pub const DEFAULT_CAPABILITIES: &str = "3brTvw==";
pub const DEFAULT_LANGUAGE: &str = "en-US";

const BASE_URL_VAR: &str = "GRAM_BASE_URL";
const USER_AGENT_VAR: &str = "GRAM_USER_AGENT";
const APP_ID_VAR: &str = "GRAM_APP_ID";
const LANGUAGE_VAR: &str = "GRAM_LANGUAGE";

/// Host and device identity every request is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Versioned API root, e.g. `https://i.instagram.com/api/v1`.
    pub base_url: String,
    pub user_agent: String,
    pub app_id: String,
    pub capabilities: String,
    pub language: String,
}

impl ApiConfig {
    /// Reads overrides from `GRAM_*` environment variables, falling back to
    /// the defaults for anything unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with variables resolved by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
        };
        Self {
            base_url: var(BASE_URL_VAR, defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            user_agent: var(USER_AGENT_VAR, defaults.user_agent),
            app_id: var(APP_ID_VAR, defaults.app_id),
            capabilities: defaults.capabilities,
            language: var(LANGUAGE_VAR, defaults.language),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The header set attached by `Endpoint::appending_default_header`.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("X-IG-App-ID".to_string(), self.app_id.clone()),
            ("X-IG-Capabilities".to_string(), self.capabilities.clone()),
            ("X-IG-Connection-Type".to_string(), "WIFI".to_string()),
            ("Accept-Language".to_string(), self.language.clone()),
        ]
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            capabilities: DEFAULT_CAPABILITIES.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}
