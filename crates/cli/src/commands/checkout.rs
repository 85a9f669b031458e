//! Buy-now and quote commands.

use mass_market_core::ProductId;
use mass_market_storefront::services::QuoteRequest;
use mass_market_storefront::{AppError, AppState};

/// # Errors
///
/// Returns an error if nobody is logged in, the product or address is
/// unknown, or the cart cannot be saved.
pub async fn buy(
    state: &AppState,
    id: ProductId,
    quantity: u32,
    address: Option<&str>,
) -> mass_market_storefront::Result<()> {
    let product = state.product(id)?;
    let checkout = state.checkout();
    let address_id = match address {
        Some(address) => address.to_owned(),
        None => checkout
            .default_address()
            .map(|address| address.id.clone())
            .ok_or_else(|| AppError::BadRequest("No saved shipping address".to_string()))?,
    };

    println!(
        "Estimated delivery: {}. Processing...",
        checkout.estimated_delivery()
    );
    let confirmation = checkout.buy_now(product, quantity, &address_id).await?;

    println!("Purchase completed successfully!");
    println!("Order:    {}", confirmation.reference);
    println!(
        "Item:     {} x {}",
        confirmation.quantity, confirmation.product_name
    );
    println!(
        "Ship to:  {} - {}",
        confirmation.ship_to.name,
        confirmation.ship_to.single_line()
    );
    println!("Delivery: {}", confirmation.delivery);
    println!("Cart:     {} item(s)", confirmation.cart_count);
    Ok(())
}

/// Form fields given on the command line. Missing ones come from the draft.
pub struct QuoteFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

impl QuoteFields {
    fn merge_into(self, mut draft: QuoteRequest) -> QuoteRequest {
        if let Some(full_name) = self.full_name {
            draft.full_name = full_name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(phone) = self.phone {
            draft.phone = phone;
        }
        if let Some(note) = self.note {
            draft.note = note;
        }
        draft
    }
}

/// # Errors
///
/// Returns an error if the product is unknown, the form is invalid, or the
/// draft cannot be saved.
pub async fn quote(
    state: &AppState,
    id: ProductId,
    fields: QuoteFields,
) -> mass_market_storefront::Result<()> {
    let product = state.product(id)?;
    let quotes = state.quotes();
    let draft = quotes.load_draft();
    if let Some(notice) = draft.notice {
        println!("{notice}");
    }

    let request = fields.merge_into(draft.value);
    let receipt = quotes.submit(product, &request).await?;

    println!("Quote request sent successfully!");
    println!("Reference:  {}", receipt.reference);
    println!("Order code: {}", receipt.order_code);
    println!("Model:      {}", receipt.model);
    println!(
        "Sent to:    {} and {}",
        receipt.recipients[0], receipt.recipients[1]
    );
    Ok(())
}
