//! The authenticated request engine.
//!
//! One [`ApiClient`] serves a single user session. Every call reads the
//! access token from the session's [`TokenStore`], attaches it as a bearer
//! header, and on a 401 runs the strictly bounded recovery sequence:
//! refresh once, retry once, return whatever the retry produced. The
//! client never calls back into page code and never interprets
//! business-level error bodies.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use rentflow_core::AuthTokenPair;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::{ApiRequest, FormPart, FormValue, RequestBody};
use crate::token::TokenStore;

const LOGIN_PATH: &str = "auth/login/";
const REGISTER_PATH: &str = "auth/register/";
const REFRESH_PATH: &str = "auth/token/refresh/";

/// How much of an error body to keep when reporting it.
const BODY_SNIPPET_LEN: usize = 200;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the rental-management API.
///
/// Cheap to clone; all clones share one `reqwest::Client` and one
/// [`TokenStore`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a client for one user session.
    #[must_use]
    pub fn new(config: &ApiConfig, tokens: TokenStore) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                tokens,
            }),
        }
    }

    /// The session's token store.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    // =========================================================================
    // Authenticated requests
    // =========================================================================

    /// Issue an authenticated request, returning the HTTP response
    /// unmodified except for the one-shot refresh-and-retry on 401.
    ///
    /// Ordinary error statuses (4xx/5xx other than the handled 401) are
    /// not errors here; they come back as responses for the caller to
    /// interpret.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when no access token is
    /// stored (no network request is attempted), and
    /// [`ApiError::Transport`] when the request itself cannot be sent.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let access = self
            .inner
            .tokens
            .access()
            .ok_or(ApiError::Unauthenticated)?;

        let response = self.execute(request, &access).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("request was unauthorized, attempting one token refresh");
        // Strictly bounded: one refresh, one retry, and whatever the retry
        // produced - even another 401 - goes back to the caller.
        match self.refresh_access_token().await? {
            Some(fresh) => {
                let retried = self.execute(request, &fresh).await?;
                Ok(retried)
            }
            None => Ok(response),
        }
    }

    /// Issue an authenticated request and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, plus
    /// [`ApiError::SessionExpired`] when the response is still 401 after
    /// the one-shot recovery, and [`ApiError::UnexpectedStatus`] for other
    /// non-success statuses.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                status,
                body: snippet(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Returns the new access token, or `None` when no refresh token is
    /// stored or the refresh was refused - in which case the stored pair
    /// has been cleared. Never retries, never recurses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] only if the configured base URL
    /// cannot absorb the refresh path. Transport failures during the
    /// refresh count as refresh failure, not as errors.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<Option<String>, ApiError> {
        let Some(refresh) = self.inner.tokens.refresh() else {
            return Ok(None);
        };

        let url = self.endpoint(REFRESH_PATH)?;
        let outcome = self
            .inner
            .http
            .post(url)
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await;

        let response = match outcome {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected, clearing session");
                self.inner.tokens.clear();
                return Ok(None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh did not complete, clearing session");
                self.inner.tokens.clear();
                return Ok(None);
            }
        };

        match response.json::<RefreshResponse>().await {
            Ok(body) if !body.access.is_empty() => {
                self.inner.tokens.replace_access(body.access.clone());
                tracing::debug!("access token refreshed");
                Ok(Some(body.access))
            }
            Ok(_) | Err(_) => {
                tracing::warn!("token refresh response had no usable access token, clearing session");
                self.inner.tokens.clear();
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Session endpoints (no bearer token)
    // =========================================================================

    /// Log in and store the returned token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthRejected`] when the API refuses the
    /// credentials, or [`ApiError::Transport`] on network failure.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate(LOGIN_PATH, credentials).await
    }

    /// Register a new account and store the returned token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthRejected`] when the API refuses the
    /// registration, or [`ApiError::Transport`] on network failure.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.authenticate(REGISTER_PATH, registration).await
    }

    /// Delete the stored token pair, ending the session locally.
    pub fn logout(&self) {
        self.inner.tokens.clear();
        tracing::debug!("session cleared");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn authenticate<T: Serialize>(&self, path: &str, payload: &T) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.http.post(url).json(payload).send().await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthRejected(snippet(&body)));
        }

        let pair: TokenPairResponse = response.json().await?;
        self.inner.tokens.set_pair(AuthTokenPair {
            access: pair.access,
            refresh: pair.refresh,
        });
        tracing::debug!("session established");
        Ok(())
    }

    /// Issue one attempt of `request` with the given access token.
    async fn execute(&self, request: &ApiRequest, access: &str) -> Result<Response, ApiError> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .headers(compose_headers(request))
            .bearer_auth(access);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value)?),
            RequestBody::Form(parts) => builder.multipart(build_form(parts)?),
        };

        Ok(builder.send().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|source| ApiError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }
}

/// Copy the caller's headers and set the JSON content type unless the body
/// is a multipart form, whose boundary content-type the transport sets
/// itself. The bearer header is attached separately per attempt.
fn compose_headers(request: &ApiRequest) -> HeaderMap {
    let mut headers = request.headers.clone();
    if !request.body.is_form() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    headers
}

/// Rebuild the multipart form for one attempt. Parts are kept as plain
/// data so a retried request gets an identical body.
fn build_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match &part.value {
            FormValue::Text(value) => form.text(part.name.clone(), value.clone()),
            FormValue::File {
                filename,
                content_type,
                data,
            } => {
                let file = reqwest::multipart::Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(content_type)?;
                form.part(part.name.clone(), file)
            }
        };
    }
    Ok(form)
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Deserialize)]
struct TokenPairResponse {
    access: String,
    refresh: String,
}

/// Login credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    /// Create login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// New-account registration details.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    password: String,
}

impl Registration {
    /// Create registration details.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
