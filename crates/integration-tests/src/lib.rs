//! Integration test support for the Tamarind client crates.
//!
//! Provides [`StubApi`], an in-process axum server that mimics the backend's
//! REST surface closely enough to exercise the real HTTP paths: bearer
//! attach, the 401 refresh-and-retry lifecycle, binary receipt downloads,
//! and the cart merge. Each test spawns its own stub on an ephemeral port,
//! so tests run in parallel without a shared backend.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

use tamarind_storefront::StorefrontConfig;

/// Receipt bytes served by the stub.
pub const RECEIPT_BYTES: &[u8] = b"%PDF-1.4 stub receipt";

/// Mutable stub behaviour and call accounting.
#[derive(Debug, Default)]
pub struct StubState {
    /// Access tokens the protected routes accept.
    pub valid_access: HashSet<String>,
    /// The refresh token the refresh endpoint accepts.
    pub refresh_token: Option<String>,
    /// Access token issued by a successful refresh.
    pub refreshed_access: Option<String>,
    /// When set, the refresh endpoint rejects every attempt.
    pub refresh_fails: bool,
    /// Number of refresh attempts observed.
    pub refresh_calls: usize,
    /// Number of profile requests observed (including rejected ones).
    pub profile_hits: usize,
    /// Number of receipt requests observed.
    pub receipt_hits: usize,
    /// Server-side cart rows, as served by `GET /api/cart`.
    pub cart_rows: Vec<Value>,
    /// Bodies received by `POST /api/cart`.
    pub cart_posts: Vec<Value>,
}

type Shared = Arc<Mutex<StubState>>;

/// Handle to a running stub backend.
pub struct StubApi {
    addr: SocketAddr,
    state: Shared,
}

impl StubApi {
    /// Spawn the stub on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound; tests cannot proceed without
    /// it.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(StubState::default()));

        let app = Router::new()
            .route("/api/auth/refresh", post(refresh))
            .route("/api/auth/me", get(profile))
            .route("/api/orders/{id}/receipt", get(receipt))
            .route("/api/cart", get(cart_list).post(cart_add))
            .route("/api/wishlist", get(wishlist_list))
            .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });

        Self { addr, state }
    }

    /// Origin of the stub, e.g. `http://127.0.0.1:49213`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Lock the stub state for setup or assertions.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state lock")
    }

    /// Client configuration pointing at this stub, with a unique temp state
    /// directory so tests never share persisted state.
    ///
    /// # Panics
    ///
    /// Panics if the stub address does not parse as a URL.
    #[must_use]
    pub fn client_config(&self) -> StorefrontConfig {
        StorefrontConfig {
            base_url: Url::parse(&self.base_url()).expect("stub base url"),
            api_prefix: "/api".to_string(),
            timeout: std::time::Duration::from_secs(5),
            retry_attempts: 1,
            retry_delay: std::time::Duration::from_millis(10),
            state_dir: std::env::temp_dir().join(format!(
                "tamarind-it-{}-{}",
                std::process::id(),
                self.addr.port()
            )),
            sentry_dsn: None,
        }
    }

    /// Convenience setup: accept `access`, refresh with `refresh` into
    /// `fresh`.
    pub fn seed_tokens(&self, access: &str, refresh: &str, fresh: &str) {
        let mut state = self.state();
        state.valid_access.insert(access.to_string());
        state.refresh_token = Some(refresh.to_string());
        state.refreshed_access = Some(fresh.to_string());
    }

    /// Add a server-side cart row.
    pub fn seed_cart_row(
        &self,
        id: i32,
        product_id: i32,
        quantity: u32,
        size: Option<&str>,
    ) {
        self.state().cart_rows.push(json!({
            "id": id,
            "product": stub_product(product_id),
            "quantity": quantity,
            "size": size,
            "color": null,
        }));
    }
}

fn stub_product(id: i32) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "slug": format!("product-{id}"),
        "price": "10.00",
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": message})),
    )
        .into_response()
}

fn authorized(state: &StubState, headers: &HeaderMap) -> bool {
    bearer(headers).is_some_and(|token| state.valid_access.contains(&token))
}

async fn refresh(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = shared.lock().expect("stub state lock");
    state.refresh_calls += 1;

    if state.refresh_fails {
        return unauthorized("Refresh token revoked");
    }

    let presented = bearer(&headers);
    if presented.is_some()
        && presented == state.refresh_token
        && let Some(fresh) = state.refreshed_access.clone()
    {
        state.valid_access.insert(fresh.clone());
        return Json(json!({"access_token": fresh})).into_response();
    }

    unauthorized("Invalid refresh token")
}

async fn profile(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = shared.lock().expect("stub state lock");
    state.profile_hits += 1;

    if !authorized(&state, &headers) {
        return unauthorized("Token has expired");
    }

    Json(json!({
        "user": {
            "id": 1,
            "name": "Stub Customer",
            "email": "stub@example.com",
        }
    }))
    .into_response()
}

async fn receipt(
    State(shared): State<Shared>,
    Path(_id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut state = shared.lock().expect("stub state lock");
    state.receipt_hits += 1;

    if !authorized(&state, &headers) {
        return unauthorized("Token has expired");
    }

    (
        [(header::CONTENT_TYPE, "application/pdf")],
        RECEIPT_BYTES.to_vec(),
    )
        .into_response()
}

async fn cart_list(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = shared.lock().expect("stub state lock");
    if !authorized(&state, &headers) {
        return unauthorized("Token has expired");
    }
    Json(json!({"items": state.cart_rows, "subtotal": null, "total": null})).into_response()
}

async fn cart_add(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = shared.lock().expect("stub state lock");
    if !authorized(&state, &headers) {
        return unauthorized("Token has expired");
    }

    state.cart_posts.push(body.clone());

    let product_id = body["product_id"].as_i64().unwrap_or_default();
    #[allow(clippy::cast_possible_truncation)]
    let item = json!({
        "id": 100 + state.cart_rows.len() as i64,
        "product": stub_product(product_id as i32),
        "quantity": body["quantity"].as_u64().unwrap_or(1),
        "size": body["size"],
        "color": body["color"],
    });
    state.cart_rows.push(item.clone());

    Json(json!({"message": "Item added to cart", "item": item})).into_response()
}

async fn wishlist_list(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = shared.lock().expect("stub state lock");
    if !authorized(&state, &headers) {
        return unauthorized("Token has expired");
    }
    Json(json!({"items": []})).into_response()
}
