//! Shipping addresses.

use serde::{Deserialize, Serialize};

/// A saved shipping address offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Stable identifier, e.g. `addr1`.
    pub id: String,
    /// Label shown to the shopper ("Home", "Office").
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Preselected at checkout.
    #[serde(default)]
    pub default: bool,
}

impl Address {
    /// One-line form, e.g. `123 Main Street, San Francisco, CA 94105`.
    #[must_use]
    pub fn single_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// The address to preselect: the one flagged default, else the first.
#[must_use]
pub fn default_address(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|address| address.default)
        .or_else(|| addresses.first())
}
