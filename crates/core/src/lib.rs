//! Tamarind Core - Shared types library.
//!
//! This crate provides common types used across all Tamarind client components:
//! - `storefront` - Customer-facing API client and state containers
//! - `admin` - Back-office API client
//! - `cli` - Command-line surface driving both clients
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no persisted
//! state. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, statuses,
//!   and the cart/wishlist identity keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
