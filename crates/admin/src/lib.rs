//! Tamarind Admin - back-office API client.
//!
//! Talks to the admin surface of the Tamarind backend: dashboard stats,
//! user/product/section/order management, bulk CSV and image uploads, and
//! the analytics override. Fully isolated from the customer client: its own
//! configuration, its own token pair, its own error type. Logging in here
//! never touches a customer session and vice versa.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;

pub use client::AdminClient;
pub use config::AdminConfig;
pub use error::AdminApiError;
