//! Persisted cart operations.

use rust_decimal::Decimal;
use tracing::{instrument, warn};

use mass_market_core::ProductId;

use super::{Cart, CartTotals};
use crate::catalog::Product;
use crate::storage::{self, KeyValueStore, Loaded, StorageError, keys};

/// Notice shown when the persisted cart could not be read.
pub const CART_LOAD_NOTICE: &str = "There was an error loading your cart";

/// Cart operations backed by a [`KeyValueStore`].
///
/// Every mutation writes the full line list to `cartItems`, then the total
/// quantity to `cartCount`. Subscribers of the store see the count event
/// last, after the lines are already in place.
pub struct CartService<'a> {
    store: &'a dyn KeyValueStore,
    tax_rate: Decimal,
}

impl<'a> CartService<'a> {
    /// Create a cart service.
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore, tax_rate: Decimal) -> Self {
        Self { store, tax_rate }
    }

    /// Read the persisted cart.
    ///
    /// A failed read or a value that does not decode yields an empty cart
    /// with [`CART_LOAD_NOTICE`].
    #[must_use]
    pub fn load(&self) -> Loaded<Cart> {
        match storage::get_json::<Cart>(self.store, keys::CART_ITEMS) {
            Ok(cart) => Loaded::ok(cart.unwrap_or_default()),
            Err(e) => {
                warn!(error = %e, "Error loading cart");
                Loaded::degraded(Cart::default(), CART_LOAD_NOTICE)
            }
        }
    }

    /// The persisted cart, empty if it cannot be read.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.load().value
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart().count()
    }

    /// Totals for the persisted cart at the configured tax rate.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart().totals(self.tax_rate)
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// A quantity of 0 changes nothing and writes nothing. Returns the new
    /// total quantity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&self, product: &Product, quantity: u32) -> Result<u32, StorageError> {
        let mut cart = self.cart();
        if !cart.add(product, quantity) {
            return Ok(cart.count());
        }
        self.save(&cart)
    }

    /// Delete the line for `id`. Returns the new total quantity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be written.
    #[instrument(skip(self))]
    pub fn remove(&self, id: ProductId) -> Result<u32, StorageError> {
        let mut cart = self.cart();
        cart.remove(id);
        self.save(&cart)
    }

    /// Set the quantity on the line for `id`.
    ///
    /// Quantities below 1 are ignored, as are ids not in the cart; neither
    /// writes anything. Returns the (possibly unchanged) total quantity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be written.
    #[instrument(skip(self))]
    pub fn set_quantity(&self, id: ProductId, quantity: i64) -> Result<u32, StorageError> {
        let mut cart = self.cart();
        let Ok(quantity) = u32::try_from(quantity) else {
            return Ok(cart.count());
        };
        if !cart.set_quantity(id, quantity) {
            return Ok(cart.count());
        }
        self.save(&cart)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CART_ITEMS)?;
        self.store.set(keys::CART_COUNT, "0")
    }

    fn save(&self, cart: &Cart) -> Result<u32, StorageError> {
        storage::set_json(self.store, keys::CART_ITEMS, cart)?;
        let count = cart.count();
        self.store.set(keys::CART_COUNT, &count.to_string())?;
        Ok(count)
    }
}
