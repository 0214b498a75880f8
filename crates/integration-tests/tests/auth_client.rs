//! Integration tests for the authenticated HTTP client.
//!
//! Each test spawns its own in-process mock API and asserts both the
//! response the caller sees and the exact number of network round trips
//! the client made.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use rentflow_client::{ApiError, ApiRequest, Credentials, FormPart, Registration, TokenStore};
use rentflow_integration_tests::{
    INITIAL_ACCESS, INITIAL_REFRESH, REFRESHED_ACCESS, TEST_EMAIL, TEST_PASSWORD, TestApi,
    init_tracing,
};

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_valid_token_issues_no_refresh() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, _tokens) = api.authenticated_client();

    let response = client.send(&ApiRequest::get("rentals/")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(api.protected_calls(), 1);
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn test_identical_requests_are_independent() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();

    let request = ApiRequest::get("rentals/");
    let first = client.send(&request).await.unwrap();
    let second = client.send(&request).await.unwrap();

    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);
    assert_eq!(api.protected_calls(), 2);
    assert_eq!(api.refresh_calls(), 0);
    // no state leaked between the two calls
    assert_eq!(tokens.access().as_deref(), Some(INITIAL_ACCESS));
    assert_eq!(tokens.refresh().as_deref(), Some(INITIAL_REFRESH));
}

// ============================================================================
// Refresh & Retry
// ============================================================================

#[tokio::test]
async fn test_expired_token_refreshes_once_and_retries_once() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();
    api.expire_access_token();

    let response = client.send(&ApiRequest::get("rentals/")).await.unwrap();

    // caller sees the retry's success
    assert_eq!(response.status(), 200);
    // original attempt + retry, one refresh in between
    assert_eq!(api.protected_calls(), 2);
    assert_eq!(api.refresh_calls(), 1);
    // access replaced in place, refresh token untouched
    assert_eq!(tokens.access().as_deref(), Some(REFRESHED_ACCESS));
    assert_eq!(tokens.refresh().as_deref(), Some(INITIAL_REFRESH));
}

#[tokio::test]
async fn test_retry_that_still_401s_is_returned_without_second_refresh() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();
    api.expire_access_token();
    // refresh succeeds but the server keeps rejecting the new token
    api.state.accept_refreshed.store(false, Ordering::SeqCst);

    let response = client.send(&ApiRequest::get("rentals/")).await.unwrap();

    // the retry's 401 comes back as-is; no loop, no second refresh
    assert_eq!(response.status(), 401);
    assert_eq!(api.protected_calls(), 2);
    assert_eq!(api.refresh_calls(), 1);
    // the refreshed access token was still stored
    assert_eq!(tokens.access().as_deref(), Some(REFRESHED_ACCESS));
}

#[tokio::test]
async fn test_no_refresh_token_returns_original_401_untouched() {
    init_tracing();
    let api = TestApi::spawn().await;
    let tokens = TokenStore::with_access("stale-access");
    let client = api.client(tokens.clone());

    let response = client.send(&ApiRequest::get("rentals/")).await.unwrap();

    assert_eq!(response.status(), 401);
    assert_eq!(api.protected_calls(), 1);
    // no refresh call was even attempted
    assert_eq!(api.refresh_calls(), 0);
    // stored tokens unchanged
    assert_eq!(tokens.access().as_deref(), Some("stale-access"));
    assert_eq!(tokens.refresh(), None);
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_and_surfaces_401() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();
    api.expire_access_token();
    api.state.refresh_enabled.store(false, Ordering::SeqCst);

    let response = client.send(&ApiRequest::get("rentals/")).await.unwrap();

    // original 401 surfaced, exactly one refresh attempt, no retry
    assert_eq!(response.status(), 401);
    assert_eq!(api.protected_calls(), 1);
    assert_eq!(api.refresh_calls(), 1);
    // both tokens removed
    assert!(!tokens.is_authenticated());
    assert_eq!(tokens.refresh(), None);
}

#[tokio::test]
async fn test_no_stored_token_fails_without_network() {
    init_tracing();
    let api = TestApi::spawn().await;
    let client = api.client(TokenStore::new());

    let err = client
        .send(&ApiRequest::get("rentals/"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated));
    assert_eq!(api.protected_calls(), 0);
    assert_eq!(api.refresh_calls(), 0);
}

// ============================================================================
// Response Pass-Through
// ============================================================================

#[tokio::test]
async fn test_other_error_statuses_pass_through_unmodified() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, _tokens) = api.authenticated_client();
    api.state.reject_orders.store(true, Ordering::SeqCst);

    let request = ApiRequest::post_json("orders/", &serde_json::json!({ "items": [] })).unwrap();
    let response = client.send(&request).await.unwrap();

    // a 422 is business feedback, not a token problem
    assert_eq!(response.status(), 422);
    assert_eq!(api.refresh_calls(), 0);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "card declined");
}

#[tokio::test]
async fn test_fetch_json_maps_post_recovery_401_to_session_expired() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, _tokens) = api.authenticated_client();
    api.expire_access_token();
    api.state.refresh_enabled.store(false, Ordering::SeqCst);

    let err = client
        .fetch_json::<serde_json::Value>(&ApiRequest::get("rentals/"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
}

// ============================================================================
// Multipart Upload
// ============================================================================

#[tokio::test]
async fn test_form_upload_sends_multipart_content_type() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, _tokens) = api.authenticated_client();

    let request = ApiRequest::post_form(
        "uploads/",
        vec![
            FormPart::text("caption", "front view"),
            FormPart::file("image", "front.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]),
        ],
    );
    let response = client.send(&request).await.unwrap();

    assert_eq!(response.status(), 201);
    assert_eq!(api.state.upload_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_form_upload_survives_refresh_and_retry() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();
    api.expire_access_token();

    let request = ApiRequest::post_form(
        "uploads/",
        vec![FormPart::file(
            "image",
            "front.jpg",
            "image/jpeg",
            vec![0xff, 0xd8, 0xff],
        )],
    );
    let response = client.send(&request).await.unwrap();

    // the form body was rebuilt for the retry
    assert_eq!(response.status(), 201);
    assert_eq!(api.state.upload_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(tokens.access().as_deref(), Some(REFRESHED_ACCESS));
}

// ============================================================================
// Session Endpoints
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_pair() {
    init_tracing();
    let api = TestApi::spawn().await;
    let tokens = TokenStore::new();
    let client = api.client(tokens.clone());

    client
        .login(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    assert!(tokens.is_authenticated());
    assert_eq!(tokens.access().as_deref(), Some(INITIAL_ACCESS));
    assert_eq!(tokens.refresh().as_deref(), Some(INITIAL_REFRESH));
}

#[tokio::test]
async fn test_registration_stores_token_pair() {
    init_tracing();
    let api = TestApi::spawn().await;
    let tokens = TokenStore::new();
    let client = api.client(tokens.clone());

    client
        .register(&Registration::new(
            "new@example.com",
            "New",
            "Customer",
            "s3cret-pw!",
        ))
        .await
        .unwrap();

    assert!(tokens.is_authenticated());
    assert_eq!(tokens.refresh().as_deref(), Some(INITIAL_REFRESH));
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    init_tracing();
    let api = TestApi::spawn().await;
    let tokens = TokenStore::new();
    let client = api.client(tokens.clone());

    let err = client
        .login(&Credentials::new(TEST_EMAIL, "wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthRejected(_)));
    assert!(!tokens.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (client, tokens) = api.authenticated_client();

    client.logout();

    assert!(!tokens.is_authenticated());
    let err = client.send(&ApiRequest::get("rentals/")).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
}

/// Two sessions with separate stores do not share tokens.
#[tokio::test]
async fn test_sessions_are_isolated() {
    init_tracing();
    let api = TestApi::spawn().await;
    let (first_client, first_tokens) = api.authenticated_client();
    let (second_client, second_tokens) = api.authenticated_client();

    first_client.logout();

    assert!(!first_tokens.is_authenticated());
    assert!(second_tokens.is_authenticated());

    let response = second_client
        .send(&ApiRequest::get("rentals/"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
