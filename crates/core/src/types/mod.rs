//! Core types for Tamarind.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod key;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use key::{CartLineKey, WishlistKey};
pub use price::Price;
pub use status::*;
