//! Simulated "buy now" checkout.
//!
//! Nothing is charged or shipped. A purchase adds the product to the cart,
//! waits out a fake processing delay, and hands back a confirmation.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use mass_market_core::Email;

use crate::cart::CartService;
use crate::catalog::Product;
use crate::models::address::{self, Address};
use crate::models::AuthState;
use crate::storage::{KeyValueStore, StorageError};

/// Earliest delivery, in days after the order is placed.
pub const DELIVERY_MIN_DAYS: u64 = 3;
/// Latest delivery, in days after the order is placed.
pub const DELIVERY_MAX_DAYS: u64 = 5;

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Buying requires a logged-in account.
    #[error("you must be logged in to buy")]
    LoginRequired,

    /// Quantities start at 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The chosen shipping address is not one of the saved addresses.
    #[error("unknown shipping address: {0}")]
    UnknownAddress(String),

    /// The cart or login flags could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Estimated delivery dates, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DeliveryWindow {
    /// The window for an order placed on `placed`.
    #[must_use]
    pub fn from_order_date(placed: NaiveDate) -> Self {
        let shift = |days| placed.checked_add_days(Days::new(days)).unwrap_or(placed);
        Self {
            earliest: shift(DELIVERY_MIN_DAYS),
            latest: shift(DELIVERY_MAX_DAYS),
        }
    }
}

impl fmt::Display for DeliveryWindow {
    /// Short month and day, e.g. `Apr 16–Apr 18`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}",
            self.earliest.format("%b %-d"),
            self.latest.format("%b %-d")
        )
    }
}

/// Result of a completed purchase.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub reference: Uuid,
    pub placed_at: DateTime<Local>,
    pub product_name: String,
    pub quantity: u32,
    /// Total cart quantity after the purchase was added.
    pub cart_count: u32,
    pub ship_to: Address,
    pub buyer: Option<Email>,
    pub delivery: DeliveryWindow,
}

/// Runs the buy-now flow.
pub struct CheckoutService<'a> {
    store: &'a dyn KeyValueStore,
    addresses: &'a [Address],
    tax_rate: Decimal,
    latency: Duration,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(
        store: &'a dyn KeyValueStore,
        addresses: &'a [Address],
        tax_rate: Decimal,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            addresses,
            tax_rate,
            latency,
        }
    }

    /// Saved shipping addresses.
    #[must_use]
    pub const fn addresses(&self) -> &'a [Address] {
        self.addresses
    }

    /// The address preselected at checkout.
    #[must_use]
    pub fn default_address(&self) -> Option<&'a Address> {
        address::default_address(self.addresses)
    }

    /// Estimated delivery for an order placed now.
    #[must_use]
    pub fn estimated_delivery(&self) -> DeliveryWindow {
        DeliveryWindow::from_order_date(Local::now().date_naive())
    }

    /// Buy `quantity` of `product`, shipped to `address_id`.
    ///
    /// The product is added to the cart before the simulated processing
    /// delay, so the cart reflects the purchase even while it is pending.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` if nobody is logged in.
    /// Returns `CheckoutError::InvalidQuantity` if `quantity` is 0.
    /// Returns `CheckoutError::UnknownAddress` if `address_id` is not saved.
    /// Returns `CheckoutError::Storage` if the cart cannot be written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn buy_now(
        &self,
        product: &Product,
        quantity: u32,
        address_id: &str,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let auth = AuthState::read(self.store)?;
        if !auth.is_logged_in {
            return Err(CheckoutError::LoginRequired);
        }
        if quantity == 0 {
            return Err(CheckoutError::InvalidQuantity);
        }
        let ship_to = self
            .addresses
            .iter()
            .find(|address| address.id == address_id)
            .ok_or_else(|| CheckoutError::UnknownAddress(address_id.to_owned()))?;

        let cart_count = CartService::new(self.store, self.tax_rate).add(product, quantity)?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let placed_at = Local::now();
        let confirmation = OrderConfirmation {
            reference: Uuid::new_v4(),
            placed_at,
            product_name: product.name.clone(),
            quantity,
            cart_count,
            ship_to: ship_to.clone(),
            buyer: auth.email,
            delivery: DeliveryWindow::from_order_date(placed_at.date_naive()),
        };
        info!(reference = %confirmation.reference, quantity, "Purchase completed");
        Ok(confirmation)
    }
}
