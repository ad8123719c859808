//! Tamarind Storefront - customer-facing API client and state containers.
//!
//! This crate is the client side of the Tamarind commerce platform: it talks
//! to the remote REST backend and keeps the customer's cart, wishlist,
//! session, addresses, and orders in local state containers.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] wraps `reqwest` with the bearer-token lifecycle:
//!   attach the access token, refresh once on 401, retry once, then fail.
//! - [`stores`] hold client-side state. Cart and wishlist work offline:
//!   mutations apply locally first and are pushed to the backend only when a
//!   session is authenticated.
//! - [`session::StorefrontSession`] composes the client and the stores into
//!   one explicit context object - no global singletons - and wires the
//!   login/logout transitions to cart/wishlist reconciliation.
//! - [`persist::StateFile`] is the local persistent storage (the browser
//!   `localStorage` role): cart lines, wishlist entries, and session tokens
//!   survive restarts as a JSON file.
//!
//! # Example
//!
//! ```rust,ignore
//! use tamarind_storefront::config::StorefrontConfig;
//! use tamarind_storefront::session::StorefrontSession;
//!
//! let config = StorefrontConfig::from_env()?;
//! let session = StorefrontSession::new(&config).await?;
//!
//! // Works anonymously; persisted locally.
//! session.cart().add_item(product, 1, Some("M".into()), None).await?;
//!
//! // Login merges the anonymous cart into the account's server-side cart.
//! session.login(&email, &password).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persist;
pub mod session;
pub mod stores;

pub use api::ApiClient;
pub use catalog::CatalogClient;
pub use config::StorefrontConfig;
pub use error::ApiError;
pub use session::StorefrontSession;
