//! Mass Market Supplies Storefront library.
//!
//! Catalog browsing, search, cart, login, theme, checkout and quote state
//! for the storefront. All "backend" behavior is simulated: the catalog and
//! accounts are static fixtures and every piece of shopper state lives in a
//! [`storage::KeyValueStore`].
//!
//! Start from [`state::AppState`], which owns the store and fixtures and
//! hands out the services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod search;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::AppState;
