//! Client error taxonomy.
//!
//! Ordinary HTTP error statuses are not errors here: [`crate::ApiClient::send`]
//! returns them unmodified for the caller to interpret. Errors are reserved
//! for the no-token precondition, transport failures, and the typed-fetch
//! layer's status interpretation.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the Rentflow API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token is stored; the caller must authenticate first.
    #[error("not authenticated: no access token is stored")]
    Unauthenticated,

    /// The session is expired beyond recovery (still 401 after the
    /// one-shot refresh); the caller must re-authenticate.
    #[error("session expired: re-authentication required")]
    SessionExpired,

    /// Network-level failure from the transport.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request payload could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request path does not join onto the configured base URL.
    #[error("invalid request path {path:?}: {source}")]
    InvalidPath {
        path: String,
        source: url::ParseError,
    },

    /// A typed fetch got a status it cannot decode a value from.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// Login or registration was refused by the API.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),
}
