//! Catalog search and filtering.
//!
//! Search is a pure derivation: a [`SearchState`] applied to the catalog and
//! sale policy yields an ordered subsequence of products. Only the query is
//! carried in the URL (`/search?query=...`); the remaining controls are
//! local to the page and reset on navigation.

use std::borrow::Cow;

use rust_decimal::Decimal;
use tracing::instrument;
use url::Url;
use url::form_urlencoded;

use crate::catalog::{Catalog, Product, SalePolicy};

/// Path of the search page.
pub const SEARCH_PATH: &str = "/search";

/// URL parameter carrying the search text.
pub const QUERY_PARAM: &str = "query";

/// Default upper price bound.
pub const DEFAULT_PRICE_CEILING: Decimal = Decimal::from_parts(150, 0, 0, false, 0);

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    /// Catalog order. No scoring is done.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortOption {
    /// All options in menu order.
    pub const ALL: [Self; 4] = [Self::Relevance, Self::PriceLow, Self::PriceHigh, Self::Rating];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Parse a sort key. Unknown keys fall back to [`SortOption::Relevance`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Relevance,
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether `price` lies within the bounds, both ends included.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Decimal::ZERO, DEFAULT_PRICE_CEILING)
    }
}

/// Search page controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub sort: SortOption,
    pub price_range: PriceRange,
    pub show_in_stock: bool,
    pub show_on_sale: bool,
    ceiling: Decimal,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::with_price_ceiling(DEFAULT_PRICE_CEILING)
    }
}

impl SearchState {
    /// Default controls with the price range set to `[0, ceiling]`.
    #[must_use]
    pub fn with_price_ceiling(ceiling: Decimal) -> Self {
        Self {
            query: String::new(),
            sort: SortOption::default(),
            price_range: PriceRange::new(Decimal::ZERO, ceiling),
            show_in_stock: true,
            show_on_sale: false,
            ceiling,
        }
    }

    /// Default controls with the query taken from `url`.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::default().with_query_from_url(url)
    }

    /// Default controls with the query taken from a raw query string
    /// (with or without the leading `?`).
    #[must_use]
    pub fn from_query_string(raw: &str) -> Self {
        Self::default().with_query_string(raw)
    }

    /// Replace the query with the one carried by `url`, keeping every other
    /// control (including the ceiling).
    #[must_use]
    pub fn with_query_from_url(self, url: &Url) -> Self {
        self.with_query(query_from_pairs(url.query_pairs()))
    }

    /// Like [`SearchState::with_query_from_url`] for a raw query string.
    #[must_use]
    pub fn with_query_string(self, raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        self.with_query(query_from_pairs(form_urlencoded::parse(raw.as_bytes())))
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restore every control except the ceiling to its default.
    pub fn reset(&mut self) {
        *self = Self::with_price_ceiling(self.ceiling);
    }

    /// The upper bound the price range resets to.
    #[must_use]
    pub const fn price_ceiling(&self) -> Decimal {
        self.ceiling
    }

    /// Whether `product` passes every filter (ignores ordering).
    #[must_use]
    pub fn accepts(&self, product: &Product, sale: &SalePolicy) -> bool {
        let needle = self.query.trim().to_lowercase();
        self.accepts_with_needle(product, sale, &needle)
    }

    fn accepts_with_needle(&self, product: &Product, sale: &SalePolicy, needle: &str) -> bool {
        (needle.is_empty() || product.matches_lowercase(needle))
            && self.price_range.contains(product.price)
            && (!self.show_in_stock || product.in_stock)
            && (!self.show_on_sale || sale.is_on_sale(product.id))
    }
}

fn query_from_pairs<'a>(mut pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> String {
    pairs
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Path of the search page for `query`, e.g. `/search?query=led+bulb`.
#[must_use]
pub fn search_path(query: &str) -> String {
    let encoded: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(QUERY_PARAM, query.trim())
        .finish();
    format!("{SEARCH_PATH}?{encoded}")
}

/// Products matching `state`, in the order `state.sort` asks for.
///
/// Sorting is stable: products that compare equal keep their catalog order.
#[must_use]
#[instrument(skip(catalog, sale), fields(query = %state.query, sort = %state.sort))]
pub fn filter_products<'c>(
    catalog: &'c Catalog,
    sale: &SalePolicy,
    state: &SearchState,
) -> Vec<&'c Product> {
    let needle = state.query.trim().to_lowercase();
    let mut results: Vec<&Product> = catalog
        .iter()
        .filter(|product| state.accepts_with_needle(product, sale, &needle))
        .collect();

    match state.sort {
        SortOption::Relevance => {}
        SortOption::PriceLow => results.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::PriceHigh => results.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::Rating => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;
    use std::str::FromStr;

    use mass_market_core::{ProductId, Rating};

    use super::*;
    use crate::catalog::tests::product;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn catalog() -> Catalog {
        let mut chair = product(9, "Office Chair", "149.99", "furniture");
        chair.in_stock = false;
        chair.rating = Rating::new(4.9).unwrap();
        let mut mouse = product(8, "Wireless Mouse", "24.99", "electronics");
        mouse.rating = Rating::new(4.8).unwrap();
        let mut spray = product(10, "Cleaning Spray", "5.99", "cleaning");
        spray.rating = Rating::new(4.4).unwrap();
        let mut spot = product(1, "MR16 LED Spotlight", "8.99", "lighting");
        spot.rating = Rating::new(4.5).unwrap();
        let mut flood = product(5, "PAR38 Outdoor Flood Light", "19.99", "lighting");
        flood.rating = Rating::new(4.4).unwrap();

        Catalog::new(vec![spot, flood, mouse, chair, spray]).unwrap()
    }

    fn sale() -> SalePolicy {
        SalePolicy {
            product_ids: BTreeSet::from([ProductId::new(1), ProductId::new(5)]),
            multiplier: dec("0.8"),
        }
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_defaults() {
        let state = SearchState::default();
        assert_eq!(state.query, "");
        assert_eq!(state.sort, SortOption::Relevance);
        assert_eq!(state.price_range, PriceRange::new(Decimal::ZERO, dec("150")));
        assert!(state.show_in_stock);
        assert!(!state.show_on_sale);
    }

    #[test]
    fn test_default_hides_out_of_stock_in_catalog_order() {
        let catalog = catalog();
        let results = filter_products(&catalog, &sale(), &SearchState::default());
        assert_eq!(ids(&results), vec![1, 5, 8, 10]);
    }

    #[test]
    fn test_query_is_case_insensitive_on_name_and_description() {
        let state = SearchState::default().with_query("  led ");
        assert_eq!(ids(&filter_products(&catalog(), &sale(), &state)), vec![1]);

        let state = SearchState::default().with_query("MOUSE DESCRIPTION");
        assert_eq!(ids(&filter_products(&catalog(), &sale(), &state)), vec![8]);
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        let mut state = SearchState::default();
        state.price_range = PriceRange::new(dec("8.99"), dec("19.99"));

        let catalog = catalog();
        let results = filter_products(&catalog, &sale(), &state);
        assert_eq!(ids(&results), vec![1, 5]);
        assert!(results.iter().all(|p| state.price_range.contains(p.price)));
    }

    #[test]
    fn test_stock_and_sale_toggles() {
        let mut state = SearchState::default();
        state.show_in_stock = false;
        assert_eq!(ids(&filter_products(&catalog(), &sale(), &state)), vec![1, 5, 8, 9, 10]);

        state.show_on_sale = true;
        assert_eq!(ids(&filter_products(&catalog(), &sale(), &state)), vec![1, 5]);
    }

    #[test]
    fn test_price_sorts_are_monotonic() {
        let mut state = SearchState::default();
        state.show_in_stock = false;
        let catalog = catalog();

        state.sort = SortOption::PriceLow;
        let low = filter_products(&catalog, &sale(), &state);
        assert!(low.windows(2).all(|w| w[0].price <= w[1].price));

        state.sort = SortOption::PriceHigh;
        let high = filter_products(&catalog, &sale(), &state);
        assert!(high.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_rating_sort_is_descending_and_stable() {
        let state = SearchState {
            sort: SortOption::Rating,
            ..SearchState::default()
        };
        // 5 and 10 tie at 4.4 and keep catalog order.
        assert_eq!(ids(&filter_products(&catalog(), &sale(), &state)), vec![8, 1, 5, 10]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let state = SearchState::default().with_query("light");
        let catalog = catalog();
        let first = filter_products(&catalog, &sale(), &state);
        let second = filter_products(&catalog, &sale(), &state);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_sort_option_parsing() {
        for option in SortOption::ALL {
            assert_eq!(SortOption::parse(option.as_str()), option);
        }
        assert_eq!(SortOption::parse("newest"), SortOption::Relevance);
    }

    #[test]
    fn test_query_round_trips_through_url() {
        let path = search_path(" led bulb & more ");
        assert_eq!(path, "/search?query=led+bulb+%26+more");

        let url = Url::parse("https://mms.ca").unwrap().join(&path).unwrap();
        assert_eq!(SearchState::from_url(&url).query, "led bulb & more");
        assert_eq!(SearchState::from_query_string("?query=par20&x=1").query, "par20");
        assert_eq!(SearchState::from_query_string("x=1").query, "");
    }

    #[test]
    fn test_reset_keeps_ceiling() {
        let mut state = SearchState::with_price_ceiling(dec("300"));
        state.query = "chair".into();
        state.sort = SortOption::PriceHigh;
        state.show_on_sale = true;
        state.price_range = PriceRange::new(dec("10"), dec("20"));

        state.reset();
        assert_eq!(state, SearchState::with_price_ceiling(dec("300")));
        assert_eq!(state.price_range.max, dec("300"));
    }

    #[test]
    fn test_query_from_link_keeps_ceiling() {
        let url = Url::parse("https://mms.ca/search?query=chair").unwrap();
        let state = SearchState::with_price_ceiling(dec("300")).with_query_from_url(&url);
        assert_eq!(state.query, "chair");
        assert_eq!(state.price_range, PriceRange::new(Decimal::ZERO, dec("300")));
        assert_eq!(state.price_ceiling(), dec("300"));

        let state = SearchState::with_price_ceiling(dec("300")).with_query_string("?query=par20");
        assert_eq!(state.query, "par20");
        assert_eq!(state.price_range.max, dec("300"));
    }

    #[test]
    fn test_surrounding_whitespace_in_query_is_ignored() {
        let catalog = catalog();
        let padded = SearchState::default().with_query("  spotlight\t");
        let plain = SearchState::default().with_query("spotlight");
        assert_eq!(
            ids(&filter_products(&catalog, &sale(), &padded)),
            ids(&filter_products(&catalog, &sale(), &plain))
        );
        assert!(padded.accepts(catalog.get(ProductId::new(1)).unwrap(), &sale()));
    }
}
