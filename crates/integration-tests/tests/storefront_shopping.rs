//! End-to-end shopping flows against the bundled fixtures.

#![allow(clippy::unwrap_used)]

use mass_market_core::ProductId;
use mass_market_integration_tests::TestContext;
use mass_market_storefront::AppError;
use mass_market_storefront::search::{SearchState, SortOption, search_path};
use mass_market_storefront::services::{CheckoutError, QuoteError, QuoteRequest};

// =============================================================================
// Browsing
// =============================================================================

#[test]
fn test_search_from_url_finds_lighting() {
    let ctx = TestContext::new();
    let state = ctx.open();

    let search = SearchState::from_query_string(search_path("par20").trim_start_matches("/search"));
    let ids: Vec<i32> = state.search(&search).iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_default_search_hides_the_out_of_stock_chair() {
    let ctx = TestContext::new();
    let state = ctx.open();

    let mut search = state.search_state();
    let results = state.search(&search);
    assert_eq!(results.len(), 11);
    assert!(results.iter().all(|p| p.id != ProductId::new(9)));

    search.show_in_stock = false;
    assert_eq!(state.search(&search).len(), 12);
}

#[test]
fn test_sorted_searches() {
    let ctx = TestContext::new();
    let state = ctx.open();

    let mut search = state.search_state();
    search.sort = SortOption::PriceLow;
    let low = state.search(&search);
    assert_eq!(low[0].name, "Multi-Surface Cleaning Spray");
    assert!(low.windows(2).all(|w| w[0].price <= w[1].price));

    search.sort = SortOption::Rating;
    let rated = state.search(&search);
    assert_eq!(rated[0].name, "Wireless Ergonomic Mouse");

    search.show_on_sale = true;
    search.sort = SortOption::PriceHigh;
    let ids: Vec<i32> = state.search(&search).iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![5, 6, 1]);
}

#[test]
fn test_deals_show_discounted_prices() {
    let ctx = TestContext::new();
    let state = ctx.open();

    let prices: Vec<String> = state
        .deals()
        .iter()
        .map(|deal| deal.sale_price.display())
        .collect();
    assert_eq!(prices, vec!["$7.19", "$15.99", "$10.39"]);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_full_purchase_flow() {
    let ctx = TestContext::new();
    let state = ctx.open();
    let mut badge = state.badge();
    let flood = state.product(ProductId::new(5)).unwrap();

    let err = state.checkout().buy_now(flood, 1, "addr1").await.unwrap_err();
    assert!(matches!(err, CheckoutError::LoginRequired));

    state.auth().attempt_login("user", "user").await.unwrap();
    state.cart().add(state.product(ProductId::new(1)).unwrap(), 1).unwrap();
    let confirmation = state.checkout().buy_now(flood, 2, "addr2").await.unwrap();

    assert_eq!(confirmation.cart_count, 3);
    assert_eq!(confirmation.ship_to.street, "456 Market Street");
    assert_eq!(confirmation.buyer.unwrap().as_str(), "user@example.com");

    assert!(badge.poll());
    assert_eq!(badge.count(), 3);

    let totals = state.cart().totals();
    assert_eq!(totals.subtotal.display(), "$48.97");
    assert_eq!(totals.tax.display(), "$3.43");
    assert_eq!(totals.total.display(), "$52.40");
}

#[tokio::test]
async fn test_wrong_password_is_a_user_error() {
    let ctx = TestContext::new();
    let state = ctx.open();

    let err = AppError::from(
        state
            .auth()
            .attempt_login("user@user.com", "wrong")
            .await
            .unwrap_err(),
    );
    assert!(err.is_user_error());
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_quote_request_round_trip() {
    let ctx = TestContext::new();
    let state = ctx.open();
    let chair = state.product(ProductId::new(9)).unwrap();

    let mut form = QuoteRequest {
        full_name: "Dana Buyer".into(),
        email: "dana@example".into(),
        phone: "555-0100".into(),
        note: "Need 40 for a new office".into(),
    };
    let err = state.quotes().submit(chair, &form).await.unwrap_err();
    assert!(
        matches!(err, QuoteError::Invalid(ref fields) if fields.email == Some("Please enter a valid email"))
    );

    form.email = "dana@example.com".into();
    let receipt = state.quotes().submit(chair, &form).await.unwrap();
    assert_eq!(receipt.order_code, "OC-9ADJ");
    assert_eq!(receipt.model, "Model AdjustableOfficeChair");
    assert_eq!(receipt.recipients[0].as_str(), "mmsinfo@mms.ca");

    // The draft is kept and survives a restart.
    assert_eq!(ctx.open().quotes().load_draft().value, form);
}
