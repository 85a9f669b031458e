//! Product catalog.
//!
//! The catalog is a read-only list of products supplied by the caller
//! (usually from the bundled YAML fixtures). It never changes after loading.

mod sale;

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mass_market_core::{Price, ProductId, Rating};

pub use sale::{Deal, SalePolicy};

/// Catalog validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A product has a negative price.
    #[error("product {id} has a negative price ({price})")]
    NegativePrice { id: ProductId, price: Decimal },
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub in_stock: bool,
    pub rating: Rating,
}

impl Product {
    /// The list price.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Derived identifiers shown on the product page and in quote requests.
    #[must_use]
    pub fn details(&self) -> ProductDetails {
        let model: String = self
            .name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let prefix: String = self.name.chars().take(3).collect::<String>().to_uppercase();

        ProductDetails {
            model: format!("Model {model}"),
            order_code: format!("OC-{}{prefix}", self.id),
        }
    }
}

/// Identifiers derived from a product's name and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetails {
    /// e.g. `Model MR16LEDSpotlight`
    pub model: String,
    /// e.g. `OC-1MR1`
    pub order_code: String,
}

/// The read-only product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating ids and prices.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id and
    /// `CatalogError::NegativePrice` if a price is below zero.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice {
                    id: product.id,
                    price: product.price,
                });
            }
        }
        Ok(Self { products })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterate products in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in `category` (case-insensitive), in catalog order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for product in &self.products {
            if !out.contains(&product.category.as_str()) {
                out.push(&product.category);
            }
        }
        out
    }

    /// Every product except `current`, shown as "related" on a product page.
    #[must_use]
    pub fn related(&self, current: ProductId) -> Vec<&Product> {
        self.products.iter().filter(|p| p.id != current).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::str::FromStr;

    use super::*;

    /// Build a product for tests.
    pub(crate) fn product(id: i32, name: &str, price: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::from_str(price).unwrap(),
            image: "/placeholder.svg".to_string(),
            category: category.to_string(),
            in_stock: true,
            rating: Rating::new(4.0).unwrap(),
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            product(1, "A", "1.00", "office"),
            product(1, "B", "2.00", "office"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = Catalog::new(vec![product(1, "A", "-0.01", "office")]).unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice { .. }));
    }

    #[test]
    fn test_lookup_and_category_helpers() {
        let catalog = Catalog::new(vec![
            product(1, "Lamp", "8.99", "lighting"),
            product(2, "Pen", "1.00", "office"),
            product(3, "Bulb", "3.00", "Lighting"),
        ])
        .unwrap();

        assert_eq!(catalog.get(ProductId::new(2)).unwrap().name, "Pen");
        assert!(catalog.get(ProductId::new(9)).is_none());

        let lighting: Vec<_> = catalog.by_category("lighting").iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(lighting, vec![1, 3]);
        assert_eq!(catalog.categories(), vec!["lighting", "office", "Lighting"]);

        let related: Vec<_> = catalog.related(ProductId::new(1)).iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(related, vec![2, 3]);
    }

    #[test]
    fn test_details_derive_model_and_order_code() {
        let details = product(1, "MR16 LED Spotlight", "8.99", "lighting").details();
        assert_eq!(details.model, "Model MR16LEDSpotlight");
        assert_eq!(details.order_code, "OC-1MR1");

        let pens = product(7, "Premium Ballpoint Pens (Pack of 12)", "8.49", "office").details();
        assert_eq!(pens.model, "Model PremiumBallpointPensPackof12");
        assert_eq!(pens.order_code, "OC-7PRE");
    }

    #[test]
    fn test_query_match_covers_description() {
        let lamp = product(1, "Lamp", "1.00", "lighting");
        assert!(lamp.matches_lowercase("lamp"));
        assert!(lamp.matches_lowercase("description"));
        assert!(!lamp.matches_lowercase("chair"));
    }
}
