//! Token lifecycle tests against the stub backend.
//!
//! Covers the 401 contract end to end over real HTTP: exactly one refresh
//! and one retry for an expired access token, session teardown when the
//! refresh itself is rejected, and direct surfacing of a 401 when no session
//! is held.

use tamarind_integration_tests::StubApi;
use tamarind_storefront::ApiClient;
use tamarind_storefront::api::session::SessionTokens;

#[tokio::test]
async fn test_expired_access_token_refreshes_once_and_retries() {
    let stub = StubApi::spawn().await;
    stub.seed_tokens("unused", "refresh-ok", "fresh-access");

    let api = ApiClient::new(&stub.client_config()).expect("build client");
    // The held access token is stale; only "fresh-access" is accepted.
    api.session()
        .set(SessionTokens::new("stale-access".into(), "refresh-ok".into()))
        .await;

    let user = api.profile().await.expect("profile after refresh");
    assert_eq!(user.name, "Stub Customer");

    let state = stub.state();
    assert_eq!(state.refresh_calls, 1, "exactly one refresh");
    assert_eq!(state.profile_hits, 2, "original attempt plus one retry");
}

#[tokio::test]
async fn test_failed_refresh_clears_session_without_second_retry() {
    let stub = StubApi::spawn().await;
    stub.seed_tokens("unused", "refresh-ok", "fresh-access");
    stub.state().refresh_fails = true;

    let api = ApiClient::new(&stub.client_config()).expect("build client");
    api.session()
        .set(SessionTokens::new("stale-access".into(), "refresh-ok".into()))
        .await;

    let err = api.profile().await.expect_err("session should expire");
    assert!(err.is_auth_error());
    assert!(!api.session().is_authenticated().await, "tokens cleared");

    let state = stub.state();
    assert_eq!(state.refresh_calls, 1);
    assert_eq!(state.profile_hits, 1, "no retry after a failed refresh");
}

#[tokio::test]
async fn test_refreshed_token_is_kept_for_later_requests() {
    let stub = StubApi::spawn().await;
    stub.seed_tokens("unused", "refresh-ok", "fresh-access");

    let api = ApiClient::new(&stub.client_config()).expect("build client");
    api.session()
        .set(SessionTokens::new("stale-access".into(), "refresh-ok".into()))
        .await;

    api.profile().await.expect("first call refreshes");
    api.profile().await.expect("second call uses the fresh token");

    let state = stub.state();
    assert_eq!(state.refresh_calls, 1, "no refresh on the second call");
    assert_eq!(state.profile_hits, 3);
}

#[tokio::test]
async fn test_unauthorized_without_session_surfaces_directly() {
    let stub = StubApi::spawn().await;

    let api = ApiClient::new(&stub.client_config()).expect("build client");

    let err = api.profile().await.expect_err("no session held");
    assert!(err.is_auth_error());

    let state = stub.state();
    assert_eq!(state.refresh_calls, 0, "no refresh without a session");
    assert_eq!(state.profile_hits, 1);
}
