//! Cart commands.

use mass_market_core::ProductId;
use mass_market_storefront::AppState;

pub fn show(state: &AppState) {
    let cart = state.cart();
    let loaded = cart.load();
    if let Some(notice) = loaded.notice {
        println!("{notice}");
    }

    let items = loaded.value;
    if items.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in items.items() {
        println!(
            "{:>3}  {:<38} {:>3} x {:>8} = {:>9}",
            item.id,
            item.name,
            item.quantity,
            item.unit_price(),
            item.line_total()
        );
    }
    let totals = items.totals(state.config().tax_rate);
    println!();
    println!("Subtotal: {}", totals.subtotal);
    println!("Tax:      {}", totals.tax);
    println!("Total:    {}", totals.total);
    println!("Items:    {}", items.count());
}

/// # Errors
///
/// Returns an error if the product is unknown or the cart cannot be saved.
pub fn add(state: &AppState, id: ProductId, quantity: u32) -> mass_market_storefront::Result<()> {
    let product = state.product(id)?;
    let count = state.cart().add(product, quantity)?;
    println!("Added {quantity} x {} to your cart ({count} item(s)).", product.name);
    Ok(())
}

/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(state: &AppState, id: ProductId) -> mass_market_storefront::Result<()> {
    let count = state.cart().remove(id)?;
    println!("Removed product {id} ({count} item(s) left).");
    Ok(())
}

/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn set(state: &AppState, id: ProductId, quantity: i64) -> mass_market_storefront::Result<()> {
    let count = state.cart().set_quantity(id, quantity)?;
    println!("Cart has {count} item(s).");
    Ok(())
}

/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(state: &AppState) -> mass_market_storefront::Result<()> {
    state.cart().clear()?;
    println!("Cart cleared.");
    Ok(())
}
