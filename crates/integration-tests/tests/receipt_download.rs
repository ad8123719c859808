//! Receipt download tests against the stub backend.

use tamarind_core::OrderId;
use tamarind_integration_tests::{RECEIPT_BYTES, StubApi};
use tamarind_storefront::ApiClient;
use tamarind_storefront::api::session::SessionTokens;

#[tokio::test]
async fn test_receipt_downloads_bytes_when_authenticated() {
    let stub = StubApi::spawn().await;
    stub.state().valid_access.insert("access".to_string());

    let api = ApiClient::new(&stub.client_config()).expect("build client");
    api.session()
        .set(SessionTokens::new("access".into(), "refresh".into()))
        .await;

    let bytes = api
        .download_receipt(OrderId::new(17))
        .await
        .expect("receipt bytes");
    assert_eq!(bytes, RECEIPT_BYTES);
}

#[tokio::test]
async fn test_receipt_requires_authentication() {
    let stub = StubApi::spawn().await;

    let api = ApiClient::new(&stub.client_config()).expect("build client");

    let err = api
        .download_receipt(OrderId::new(17))
        .await
        .expect_err("anonymous receipt download");
    assert!(err.is_auth_error(), "surfaced as an auth error, got: {err}");
    assert_eq!(stub.state().receipt_hits, 1);
}
