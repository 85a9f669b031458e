//! Shopping cart.
//!
//! [`Cart`] is the in-memory model with the line-merging rules. [`CartService`]
//! loads it from and saves it to the store; [`CartBadge`] follows the
//! persisted count through store notifications.

mod badge;
mod service;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mass_market_core::{Price, ProductId};

use crate::catalog::Product;

pub use badge::CartBadge;
pub use service::{CART_LOAD_NOTICE, CartService};

/// A persisted cart that breaks the cart invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCart {
    #[error("cart line {0} has quantity 0")]
    ZeroQuantity(ProductId),
    #[error("product {0} appears on more than one cart line")]
    DuplicateLine(ProductId),
}

/// One cart line. The product fields are a snapshot taken when the line was
/// first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl CartItem {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
        }
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price() * self.quantity
    }
}

/// Ordered cart lines, unique by product id, every quantity at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = InvalidCart;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(InvalidCart::ZeroQuantity(item.id));
            }
            if !seen.insert(item.id) {
                return Err(InvalidCart::DuplicateLine(item.id));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// Returns `false` (and changes nothing) when `quantity` is 0.
    pub fn add(&mut self, product: &Product, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        true
    }

    /// Delete the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Replace the quantity on the line for `id`.
    ///
    /// Returns `false` without changing anything when `quantity` is 0 or no
    /// line exists for `id`.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| item.quantity = quantity)
            .is_some()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Subtotal, tax and total at `tax_rate` (e.g. `0.07`).
    #[must_use]
    pub fn totals(&self, tax_rate: Decimal) -> CartTotals {
        let subtotal = self
            .items
            .iter()
            .map(CartItem::line_total)
            .fold(Price::zero(mass_market_core::CurrencyCode::USD), |acc, line| acc + line);
        let tax = subtotal.scaled(tax_rate);
        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Derived money totals. Amounts are unrounded; render with `display()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::catalog::tests::product;

    #[test]
    fn test_adding_same_product_twice_merges_lines() {
        let mut cart = Cart::default();
        let lamp = product(1, "Lamp", "8.99", "lighting");

        assert!(cart.add(&lamp, 1));
        assert!(cart.add(&lamp, 2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(lamp.id).unwrap().quantity, 3);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        assert!(!cart.add(&product(1, "Lamp", "8.99", "lighting"), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::default();
        cart.add(&product(3, "C", "1.00", "x"), 1);
        cart.add(&product(1, "A", "1.00", "x"), 1);
        cart.add(&product(3, "C", "1.00", "x"), 1);

        let ids: Vec<_> = cart.items().iter().map(|item| item.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_set_quantity_ignores_zero_and_unknown_ids() {
        let mut cart = Cart::default();
        let lamp = product(1, "Lamp", "8.99", "lighting");
        cart.add(&lamp, 2);

        assert!(!cart.set_quantity(lamp.id, 0));
        assert!(!cart.set_quantity(ProductId::new(99), 4));
        assert_eq!(cart.get(lamp.id).unwrap().quantity, 2);

        assert!(cart.set_quantity(lamp.id, 5));
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_remove_only_item_empties_cart() {
        let mut cart = Cart::default();
        let lamp = product(1, "Lamp", "8.99", "lighting");
        cart.add(&lamp, 4);

        assert!(cart.remove(lamp.id));
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert!(!cart.remove(lamp.id));
    }

    #[test]
    fn test_totals_apply_tax_without_rounding() {
        let mut cart = Cart::default();
        cart.add(&product(1, "Lamp", "8.99", "lighting"), 2);
        cart.add(&product(2, "Pen", "1.01", "office"), 1);

        let totals = cart.totals(Decimal::from_str("0.07").unwrap());
        assert_eq!(totals.subtotal.amount, Decimal::from_str("18.99").unwrap());
        assert_eq!(totals.tax.amount, Decimal::from_str("1.3293").unwrap());
        assert_eq!(totals.total.display(), "$20.32");
    }

    #[test]
    fn test_persisted_form_is_plain_line_list() {
        let mut cart = Cart::default();
        cart.add(&product(1, "Lamp", "8.99", "lighting"), 1);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["quantity"], 1);
        assert_eq!(json[0]["price"], "8.99");
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let zero = r#"[{"id":1,"name":"a","description":"","price":"1","quantity":0,"image":""}]"#;
        assert!(serde_json::from_str::<Cart>(zero).is_err());

        let line = r#"{"id":1,"name":"a","description":"","price":"1","quantity":1,"image":""}"#;
        let dupes = format!("[{line},{line}]");
        assert!(serde_json::from_str::<Cart>(&dupes).is_err());
    }
}
