//! Auth token pair issued by the rental API.

use serde::{Deserialize, Serialize};

/// The access/refresh token pair for an authenticated session.
///
/// Created on successful login or registration. The access token is
/// replaced in place on refresh; the whole pair is deleted on logout or
/// when a refresh attempt fails for good.
///
/// Implements `Debug` manually to redact both token values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenPair {
    /// Short-lived bearer token attached to API requests.
    pub access: String,
    /// Long-lived token exchanged for a new access token.
    pub refresh: String,
}

impl std::fmt::Debug for AuthTokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}
