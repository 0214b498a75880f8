//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RENTFLOW_API_BASE_URL` - Base URL of the rental-management API
//!   (e.g., `https://api.rentflow.app/api/v1/`)

use url::Url;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Rental API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all request paths are joined onto. Always ends with `/`
    /// so joining never drops a path segment.
    pub base_url: Url,
}

impl ApiConfig {
    /// Create a configuration from an explicit base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: ensure_trailing_slash(base_url),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw = get_required_env("RENTFLOW_API_BASE_URL")?;
        let base_url = parse_base_url("RENTFLOW_API_BASE_URL", &raw)?;
        Ok(Self::new(base_url))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a base URL, rejecting values `url` cannot parse.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Append a trailing slash to the URL path if it lacks one.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
