//! Integration tests for the Mass Market Supplies storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mass-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_persistence` - File store across process "restarts"
//! - `storefront_shopping` - End-to-end browse, cart, login and checkout
//!
//! Each test gets its own data directory under the system temp dir, removed
//! when the [`TestContext`] is dropped.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use mass_market_storefront::AppState;
use mass_market_storefront::config::StorefrontConfig;

/// A throwaway data directory plus the config pointing at it.
pub struct TestContext {
    data_dir: PathBuf,
    config: StorefrontConfig,
}

impl TestContext {
    /// A fresh data directory with bundled fixtures and no simulated delays.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration does not load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let data_dir = std::env::temp_dir().join(format!("mms-it-{}", uuid::Uuid::new_v4()));
        let data_dir_value = data_dir.to_string_lossy().into_owned();
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "MMS_DATA_DIR").then(|| data_dir_value.clone())
        })
        .expect("default config loads")
        .without_latency();

        Self { data_dir, config }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Open the storefront on this context's data directory. Calling this
    /// again simulates a restart: a new store reads the same file.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be opened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn open(&self) -> AppState {
        AppState::from_config(self.config.clone()).expect("storefront opens")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
