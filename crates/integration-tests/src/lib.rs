//! Integration test harness for Rentflow.
//!
//! Spawns an in-process mock of the rental-management API on an ephemeral
//! port and hands out clients pointed at it. The mock counts every
//! protected request, refresh call, and order submission so tests can
//! assert exactly how many network round trips the client made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rentflow-integration-tests
//! ```

// Test harness: panicking on broken fixtures is the desired behavior.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use url::Url;

use rentflow_client::{ApiClient, ApiConfig, TokenStore};
use rentflow_core::AuthTokenPair;

/// Tokens the mock starts out accepting/issuing.
pub const INITIAL_ACCESS: &str = "access-1";
pub const INITIAL_REFRESH: &str = "refresh-1";
pub const REFRESHED_ACCESS: &str = "access-2";

/// Credentials the mock login endpoint accepts.
pub const TEST_EMAIL: &str = "sam@example.com";
pub const TEST_PASSWORD: &str = "hunter2!";

/// Shared, inspectable state of the mock API.
#[derive(Debug)]
pub struct ApiState {
    /// Access token the protected routes currently accept.
    pub valid_access: Mutex<String>,
    /// Refresh token the refresh endpoint currently accepts.
    pub valid_refresh: Mutex<String>,
    /// Access token the next successful refresh hands out.
    pub next_access: Mutex<String>,
    /// When false, the refresh endpoint rejects every request.
    pub refresh_enabled: AtomicBool,
    /// When false, a refreshed token is issued but protected routes keep
    /// rejecting it (the retry still sees a 401).
    pub accept_refreshed: AtomicBool,
    /// When true, order placement fails with a payment error.
    pub reject_orders: AtomicBool,
    /// Number of requests that reached protected routes.
    pub protected_calls: AtomicUsize,
    /// Number of requests that reached the refresh endpoint.
    pub refresh_calls: AtomicUsize,
    /// Number of requests that reached the upload endpoint.
    pub upload_calls: AtomicUsize,
    /// Order payloads received.
    pub orders: Mutex<Vec<Value>>,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            valid_access: Mutex::new(INITIAL_ACCESS.to_string()),
            valid_refresh: Mutex::new(INITIAL_REFRESH.to_string()),
            next_access: Mutex::new(REFRESHED_ACCESS.to_string()),
            refresh_enabled: AtomicBool::new(true),
            accept_refreshed: AtomicBool::new(true),
            reject_orders: AtomicBool::new(false),
            protected_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            orders: Mutex::new(Vec::new()),
        }
    }
}

/// An in-process mock of the rental-management API.
pub struct TestApi {
    base_url: Url,
    pub state: Arc<ApiState>,
}

impl TestApi {
    /// Bind the mock to an ephemeral port and start serving.
    pub async fn spawn() -> Self {
        let state = Arc::new(ApiState::default());

        let app = Router::new()
            .route("/auth/login/", post(login))
            .route("/auth/register/", post(register))
            .route("/auth/token/refresh/", post(refresh))
            .route("/rentals/", get(rentals))
            .route("/orders/", post(place_order))
            .route("/uploads/", post(upload))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API listener");
        let addr = listener.local_addr().expect("mock API local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock API");
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("mock API base url");
        Self { base_url, state }
    }

    /// Client configuration pointing at this mock.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    /// A client backed by the given token store.
    #[must_use]
    pub fn client(&self, tokens: TokenStore) -> ApiClient {
        ApiClient::new(&self.config(), tokens)
    }

    /// A client already holding the mock's initial token pair.
    #[must_use]
    pub fn authenticated_client(&self) -> (ApiClient, TokenStore) {
        let tokens = TokenStore::with_pair(AuthTokenPair {
            access: INITIAL_ACCESS.to_string(),
            refresh: INITIAL_REFRESH.to_string(),
        });
        (self.client(tokens.clone()), tokens)
    }

    /// Number of refresh calls the mock has seen.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of protected-route requests the mock has seen.
    #[must_use]
    pub fn protected_calls(&self) -> usize {
        self.state.protected_calls.load(Ordering::SeqCst)
    }

    /// Mark the currently accepted access token as expired, so protected
    /// routes reject it until a refresh issues a new one.
    pub fn expire_access_token(&self) {
        *self.state.valid_access.lock().unwrap() = format!("{INITIAL_ACCESS}-expired");
    }
}

/// Install a test subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// =============================================================================
// Route Handlers
// =============================================================================

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn is_authorized(state: &ApiState, headers: &HeaderMap) -> bool {
    bearer(headers).as_deref() == Some(state.valid_access.lock().unwrap().as_str())
}

async fn login(State(state): State<Arc<ApiState>>, Json(body): Json<Value>) -> Response {
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        *state.valid_access.lock().unwrap() = INITIAL_ACCESS.to_string();
        *state.valid_refresh.lock().unwrap() = INITIAL_REFRESH.to_string();
        Json(json!({ "access": INITIAL_ACCESS, "refresh": INITIAL_REFRESH })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "invalid credentials" })),
        )
            .into_response()
    }
}

async fn register(State(state): State<Arc<ApiState>>, Json(body): Json<Value>) -> Response {
    if body["email"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "email is required" })),
        )
            .into_response();
    }
    *state.valid_access.lock().unwrap() = INITIAL_ACCESS.to_string();
    *state.valid_refresh.lock().unwrap() = INITIAL_REFRESH.to_string();
    (
        StatusCode::CREATED,
        Json(json!({ "access": INITIAL_ACCESS, "refresh": INITIAL_REFRESH })),
    )
        .into_response()
}

async fn refresh(State(state): State<Arc<ApiState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if !state.refresh_enabled.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "refresh token invalid" })),
        )
            .into_response();
    }

    let expected = state.valid_refresh.lock().unwrap().clone();
    if body["refresh"] != expected.as_str() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "refresh token unknown" })),
        )
            .into_response();
    }

    let issued = state.next_access.lock().unwrap().clone();
    if state.accept_refreshed.load(Ordering::SeqCst) {
        *state.valid_access.lock().unwrap() = issued.clone();
    }
    Json(json!({ "access": issued })).into_response()
}

async fn rentals(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    if is_authorized(&state, &headers) {
        Json(json!({ "results": [], "count": 0 })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn place_order(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    if !is_authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if state.reject_orders.load(Ordering::SeqCst) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "card declined" })),
        )
            .into_response();
    }

    let mut orders = state.orders.lock().unwrap();
    orders.push(body);
    let id = 9000 + orders.len();
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn upload(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    state.upload_calls.fetch_add(1, Ordering::SeqCst);
    if !is_authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if is_multipart {
        (StatusCode::CREATED, Json(json!({ "ok": true }))).into_response()
    } else {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({ "detail": "expected multipart form data" })),
        )
            .into_response()
    }
}
