//! Backend location configuration.

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable consulted by [`ApiConfig::from_env`].
pub const API_URL_ENV: &str = "GENESIS_API_URL";

/// Holds the base URL of the backend service.
///
/// Owned by the client rather than stored globally, so separate clients (and
/// parallel tests) can target different backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_url: String,
}

impl ApiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Load from `.env` / the process environment, falling back to
    /// [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_var(API_URL_ENV)
    }

    fn from_var(name: &str) -> Self {
        match std::env::var(name) {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        }
    }

    /// Replace the base URL. No validation is performed.
    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.api_url = api_url.into();
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
