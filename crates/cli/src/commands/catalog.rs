//! Catalog browsing commands.

use mass_market_core::ProductId;
use mass_market_storefront::AppState;
use mass_market_storefront::catalog::{Product, SalePolicy};
use mass_market_storefront::search::SearchState;

/// One listing line, with the sale price when the product is on sale.
fn listing(product: &Product, sale: &SalePolicy) -> String {
    let stock = if product.in_stock { "" } else { "  (out of stock)" };
    let price = match sale.sale_price(product) {
        Some(sale_price) => format!("{sale_price} (was {})", product.price()),
        None => product.price().to_string(),
    };
    format!(
        "{:>3}  {:<38} {:>20}  {}★{stock}",
        product.id, product.name, price, product.rating
    )
}

pub fn products(state: &AppState, category: Option<&str>) {
    let products: Vec<&Product> = match category {
        Some(category) => state.catalog().by_category(category),
        None => state.catalog().iter().collect(),
    };
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in products {
        println!("{}", listing(product, state.sale()));
    }
}

/// # Errors
///
/// Returns `AppError::ProductNotFound` if `id` is not in the catalog.
pub fn product(state: &AppState, id: ProductId) -> mass_market_storefront::Result<()> {
    let product = state.product(id)?;
    let details = product.details();

    println!("{}", product.name);
    println!("{}", product.description);
    println!();
    println!("Price:      {}", product.price());
    if let Some(sale_price) = state.sale().sale_price(product) {
        println!("Sale price: {sale_price}");
    }
    println!("Rating:     {}", product.rating);
    println!("Category:   {}", product.category);
    println!("In stock:   {}", if product.in_stock { "yes" } else { "no" });
    println!("Model:      {}", details.model);
    println!("Order code: {}", details.order_code);

    let related = state.catalog().related(id);
    if !related.is_empty() {
        println!();
        println!("Related products:");
        for other in related {
            println!("{}", listing(other, state.sale()));
        }
    }
    Ok(())
}

pub fn deals(state: &AppState) {
    let deals = state.deals();
    if deals.is_empty() {
        println!("No deals right now.");
        return;
    }
    for deal in deals {
        println!(
            "{:>3}  {:<38} {} (was {})",
            deal.product.id,
            deal.product.name,
            deal.sale_price,
            deal.product.price()
        );
    }
}

pub fn search(state: &AppState, search: &SearchState) {
    let results = state.search(search);
    println!(
        "{} result(s) for {:?} sorted by {}",
        results.len(),
        search.query,
        search.sort
    );
    for product in results {
        println!("{}", listing(product, state.sale()));
    }
}
