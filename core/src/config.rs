//! Base-URL configuration for the API client.
//!
//! Resolution happens once, at startup: read the environment, trim, strip a
//! single trailing slash (avoids `//api/...` joins), and fall back to the
//! local development origin when nothing usable is configured. The resolved
//! value is injected into [`crate::client::ApiClient`] and never re-read
//! per request.

/// Origin used when no base URL is configured.
pub const FALLBACK_API_URL: &str = "http://localhost:3000";

/// Environment variable consulted by [`ApiConfig::from_env`].
pub const API_URL_ENV: &str = "VIDEOTECA_API_URL";

/// Resolved API endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit URL, applying the same sanitization
    /// as [`ApiConfig::from_env`].
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: sanitize_base_url(base_url),
        }
    }

    /// Resolve the base URL from `VIDEOTECA_API_URL`, falling back to
    /// [`FALLBACK_API_URL`] when the variable is unset or blank.
    pub fn from_env() -> Self {
        let raw = std::env::var(API_URL_ENV).unwrap_or_default();
        Self::new(&raw)
    }

    /// The sanitized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(FALLBACK_API_URL)
    }
}

fn sanitize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return FALLBACK_API_URL.to_string();
    }
    // Exactly one trailing slash is stripped; deeper normalization is the
    // deployer's responsibility.
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}
