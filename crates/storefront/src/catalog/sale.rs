//! Sale pricing.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mass_market_core::{Price, ProductId};

use super::{Catalog, Product};

/// Which products are on sale and by how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePolicy {
    /// Products currently on sale.
    pub product_ids: BTreeSet<ProductId>,
    /// Multiplier applied to the list price (e.g. `0.8` for 20% off).
    pub multiplier: Decimal,
}

impl Default for SalePolicy {
    /// No products on sale.
    fn default() -> Self {
        Self {
            product_ids: BTreeSet::new(),
            multiplier: Decimal::ONE,
        }
    }
}

impl SalePolicy {
    #[must_use]
    pub fn is_on_sale(&self, id: ProductId) -> bool {
        self.product_ids.contains(&id)
    }

    /// Sale price for `product`, or `None` if it is not on sale.
    ///
    /// The returned amount is unrounded; use [`Price::display`] to render.
    #[must_use]
    pub fn sale_price(&self, product: &Product) -> Option<Price> {
        self.is_on_sale(product.id)
            .then(|| product.price().scaled(self.multiplier))
    }

    /// On-sale products with their sale prices, in catalog order.
    #[must_use]
    pub fn deals<'c>(&self, catalog: &'c Catalog) -> Vec<Deal<'c>> {
        catalog
            .iter()
            .filter_map(|product| {
                self.sale_price(product)
                    .map(|sale_price| Deal { product, sale_price })
            })
            .collect()
    }
}

/// A product paired with its sale price.
#[derive(Debug, Clone, Copy)]
pub struct Deal<'c> {
    pub product: &'c Product,
    pub sale_price: Price,
}
