//! Cart merge-on-login tests over real HTTP.
//!
//! The store-level merge logic is covered by unit tests against in-memory
//! fakes; these tests drive the same algorithm through the API client and
//! the stub backend to pin the wire behaviour.

use std::sync::Arc;

use serde_json::json;

use tamarind_integration_tests::StubApi;
use tamarind_storefront::ApiClient;
use tamarind_storefront::api::session::SessionTokens;
use tamarind_storefront::api::types::ProductSummary;
use tamarind_storefront::stores::{CartLine, CartStore};

fn product(id: i32, title: &str) -> ProductSummary {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase(),
        "price": "10.00",
    }))
    .expect("product json")
}

fn local_line(id: i32, title: &str, quantity: u32, size: Option<&str>) -> CartLine {
    CartLine {
        product: product(id, title),
        quantity,
        size: size.map(str::to_string),
        color: None,
        remote_id: None,
    }
}

async fn logged_in_store(stub: &StubApi) -> CartStore {
    stub.state().valid_access.insert("access".to_string());

    let api = ApiClient::new(&stub.client_config()).expect("build client");
    api.session()
        .set(SessionTokens::new("access".into(), "refresh".into()))
        .await;

    CartStore::new(Arc::new(api.clone()), api.session())
}

#[tokio::test]
async fn test_merge_pushes_local_only_lines_to_server() {
    let stub = StubApi::spawn().await;
    // Server already holds product 1 size M.
    stub.seed_cart_row(11, 1, 5, Some("M"));

    let store = logged_in_store(&stub).await;
    store
        .load(vec![
            local_line(1, "Shirt", 2, Some("M")), // collides, server wins
            local_line(1, "Shirt", 1, Some("L")), // new variant
            local_line(2, "Scarf", 3, None),      // new product
        ])
        .await;

    store.sync_with_backend().await.expect("sync");

    let lines = store.snapshot().await;
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.remote_id.is_some()));

    let colliding = lines
        .iter()
        .find(|l| l.size.as_deref() == Some("M"))
        .expect("colliding line kept");
    assert_eq!(colliding.quantity, 5, "server quantity wins");

    let state = stub.state();
    assert_eq!(state.cart_posts.len(), 2, "only local-only lines pushed");
    assert_eq!(state.cart_posts[0]["size"], json!("L"));
    assert_eq!(state.cart_posts[1]["product_id"], json!(2));
}

#[tokio::test]
async fn test_merge_twice_does_not_duplicate() {
    let stub = StubApi::spawn().await;

    let store = logged_in_store(&stub).await;
    store.load(vec![local_line(2, "Scarf", 3, None)]).await;

    store.sync_with_backend().await.expect("first sync");
    store.sync_with_backend().await.expect("second sync");

    assert_eq!(store.snapshot().await.len(), 1);
    assert_eq!(stub.state().cart_posts.len(), 1, "pushed exactly once");
}
