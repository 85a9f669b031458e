//! Business quote requests.
//!
//! Shoppers buying in bulk fill in a short contact form on the product page.
//! The form is saved as a draft while it is edited; submitting it validates
//! the fields and, after a simulated delay, "sends" an email to the sales
//! inbox and the requester. The send is a log line.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use mass_market_core::Email;

use crate::catalog::Product;
use crate::storage::{self, KeyValueStore, Loaded, StorageError, keys};

/// Notice shown when a saved draft could not be read.
pub const DRAFT_LOAD_NOTICE: &str = "Your saved quote request could not be restored";

/// The quote request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub note: String,
}

impl QuoteRequest {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.full_name.trim().is_empty() {
            errors.full_name = Some("Full name is required");
        }

        let email = if self.email.trim().is_empty() {
            errors.email = Some("Email is required");
            None
        } else {
            let parsed = Email::parse(&self.email).ok();
            if parsed.is_none() {
                errors.email = Some("Please enter a valid email");
            }
            parsed
        };

        if self.phone.trim().is_empty() {
            errors.phone = Some("Phone number is required");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(email),
            _ => Err(errors),
        }
    }

    fn note_or_placeholder(&self) -> &str {
        let note = self.note.trim();
        if note.is_empty() {
            "No additional notes"
        } else {
            note
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub full_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Messages in form order.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> {
        [self.full_name, self.email, self.phone].into_iter().flatten()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        f.write_str(&messages.join("; "))
    }
}

/// Quote errors.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// One or more form fields are invalid.
    #[error("invalid quote request: {0}")]
    Invalid(FieldErrors),

    /// The draft could not be written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Proof that a quote request was sent.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReceipt {
    pub reference: Uuid,
    pub submitted_at: DateTime<Local>,
    pub product_name: String,
    pub order_code: String,
    pub model: String,
    /// Sales inbox first, then the requester.
    pub recipients: [Email; 2],
    /// Plain-text body of the email.
    pub body: String,
}

/// Manages the quote draft and submissions.
pub struct QuoteService<'a> {
    store: &'a dyn KeyValueStore,
    inbox: &'a Email,
    latency: Duration,
}

impl<'a> QuoteService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, inbox: &'a Email, latency: Duration) -> Self {
        Self {
            store,
            inbox,
            latency,
        }
    }

    /// The saved draft, blank if none was saved or it cannot be read.
    #[must_use]
    pub fn load_draft(&self) -> Loaded<QuoteRequest> {
        match storage::get_json::<QuoteRequest>(self.store, keys::QUOTE_FORM) {
            Ok(draft) => Loaded::ok(draft.unwrap_or_default()),
            Err(e) => {
                warn!(error = %e, "Error loading quote draft");
                Loaded::degraded(QuoteRequest::default(), DRAFT_LOAD_NOTICE)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be written.
    pub fn save_draft(&self, draft: &QuoteRequest) -> Result<(), StorageError> {
        storage::set_json(self.store, keys::QUOTE_FORM, draft)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be removed.
    pub fn clear_draft(&self) -> Result<(), StorageError> {
        self.store.remove(keys::QUOTE_FORM)
    }

    /// Validate and send a quote request for `product`.
    ///
    /// The request is saved as the draft first, valid or not, and the draft
    /// is kept after a successful send.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError::Invalid` with every failing field.
    /// Returns `QuoteError::Storage` if the draft cannot be written.
    #[instrument(skip(self, product, request), fields(product_id = %product.id))]
    pub async fn submit(
        &self,
        product: &Product,
        request: &QuoteRequest,
    ) -> Result<QuoteReceipt, QuoteError> {
        self.save_draft(request)?;
        let requester = request.validate().map_err(QuoteError::Invalid)?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let details = product.details();
        let body = format!(
            "Quote Request for {name}\n\
             Customer: {customer}\n\
             Email: {email}\n\
             Phone: {phone}\n\
             Note: {note}\n\
             \n\
             Product: {name}\n\
             Order Code: {order_code}\n\
             Model: {model}\n\
             Price: {price}\n",
            name = product.name,
            customer = request.full_name.trim(),
            email = requester,
            phone = request.phone.trim(),
            note = request.note_or_placeholder(),
            order_code = details.order_code,
            model = details.model,
            price = product.price(),
        );

        let receipt = QuoteReceipt {
            reference: Uuid::new_v4(),
            submitted_at: Local::now(),
            product_name: product.name.clone(),
            order_code: details.order_code,
            model: details.model,
            recipients: [self.inbox.clone(), requester],
            body,
        };
        info!(
            reference = %receipt.reference,
            inbox = %receipt.recipients[0],
            requester = %receipt.recipients[1],
            "Quote request sent"
        );
        debug!(body = %receipt.body, "Quote email");
        Ok(receipt)
    }
}
