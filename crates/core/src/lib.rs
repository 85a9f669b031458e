//! Mass Market Supplies Core - Shared domain types.
//!
//! This crate provides the value types used across the storefront workspace:
//! - `storefront` - Catalog, cart, search, auth and checkout state
//! - `cli` - Command-line shell driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, ratings, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
