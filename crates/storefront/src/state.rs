//! Application state shared across callers.

use std::sync::Arc;

use mass_market_core::ProductId;
use url::Url;

use crate::cart::{CartBadge, CartService};
use crate::catalog::{Catalog, Deal, Product, SalePolicy};
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::fixtures::{FixtureError, Fixtures};
use crate::models::Address;
use crate::search::{self, SearchState};
use crate::services::{AuthService, CheckoutService, CredentialTable, QuoteService, ThemeService};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Application state shared across all callers.
///
/// This struct is cheaply cloneable via `Arc` and owns the persisted store,
/// the read-only fixtures and the configuration. Services are handed out
/// per call and borrow from it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    fixtures: Fixtures,
    store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `fixtures` - Catalog, credentials and addresses
    /// * `store` - Persisted key-value store
    #[must_use]
    pub fn new(config: StorefrontConfig, fixtures: Fixtures, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                fixtures,
                store,
            }),
        }
    }

    /// Load fixtures as configured and open the file store in the data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Fixtures` if fixtures cannot be loaded and
    /// `AppError::Storage` if the data directory cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, AppError> {
        let fixtures = Fixtures::load(&config.fixtures)?;
        let store = FileStore::open(&config.data_dir)?;
        Ok(Self::new(config, fixtures, Arc::new(store)))
    }

    /// Load fixtures as configured, backed by a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if fixtures cannot be loaded.
    pub fn in_memory(config: StorefrontConfig) -> Result<Self, FixtureError> {
        let fixtures = Fixtures::load(&config.fixtures)?;
        Ok(Self::new(config, fixtures, Arc::new(MemoryStore::new())))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persisted store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.fixtures.catalog
    }

    #[must_use]
    pub fn sale(&self) -> &SalePolicy {
        &self.inner.fixtures.sale
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialTable {
        &self.inner.fixtures.credentials
    }

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.inner.fixtures.addresses
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` if no product has `id`.
    pub fn product(&self, id: ProductId) -> Result<&Product, AppError> {
        self.catalog().get(id).ok_or(AppError::ProductNotFound(id))
    }

    /// On-sale products with their sale prices.
    #[must_use]
    pub fn deals(&self) -> Vec<Deal<'_>> {
        self.sale().deals(self.catalog())
    }

    /// Search controls at their defaults, using the configured price ceiling.
    #[must_use]
    pub fn search_state(&self) -> SearchState {
        SearchState::with_price_ceiling(self.config().price_ceiling)
    }

    /// Search controls for a link such as `/search?query=led`, using the
    /// configured price ceiling.
    #[must_use]
    pub fn search_state_from_url(&self, url: &Url) -> SearchState {
        self.search_state().with_query_from_url(url)
    }

    /// Products matching `state`.
    #[must_use]
    pub fn search(&self, state: &SearchState) -> Vec<&Product> {
        search::filter_products(self.catalog(), self.sale(), state)
    }

    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(self.store(), self.config().tax_rate)
    }

    /// A badge following the persisted cart count.
    #[must_use]
    pub fn badge(&self) -> CartBadge<'_> {
        CartBadge::new(self.store())
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store(), self.credentials(), self.config().latency.login)
    }

    #[must_use]
    pub fn theme(&self) -> ThemeService<'_> {
        ThemeService::new(self.store())
    }

    #[must_use]
    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(
            self.store(),
            self.addresses(),
            self.config().tax_rate,
            self.config().latency.checkout,
        )
    }

    #[must_use]
    pub fn quotes(&self) -> QuoteService<'_> {
        QuoteService::new(
            self.store(),
            &self.config().quote_inbox,
            self.config().latency.quote,
        )
    }
}
