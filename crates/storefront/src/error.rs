//! Unified error handling.
//!
//! Provides a unified `AppError` type for callers driving the storefront
//! (the CLI, tests). [`AppError::user_message`] is what a shopper gets
//! to see; the `Display` form carries the detail and goes to the logs.

use thiserror::Error;

use mass_market_core::ProductId;

use crate::config::ConfigError;
use crate::fixtures::FixtureError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::quote::QuoteError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Static data could not be loaded.
    #[error("Fixture error: {0}")]
    Fixtures(#[from] FixtureError),

    /// The persisted store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Quote request failed.
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// No product with this id.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Message safe to show a shopper. Internal details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Fixtures(_) => "The store is misconfigured".to_string(),
            Self::Storage(_) => "Your changes could not be saved".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::Storage(_) => "Your changes could not be saved".to_string(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::LoginRequired => "Please log in to buy".to_string(),
                CheckoutError::InvalidQuantity => "Quantity must be at least 1".to_string(),
                CheckoutError::UnknownAddress(_) => "Please choose a saved address".to_string(),
                CheckoutError::Storage(_) => "Your changes could not be saved".to_string(),
            },
            Self::Quote(err) => match err {
                QuoteError::Invalid(fields) => fields.to_string(),
                QuoteError::Storage(_) => "Your changes could not be saved".to_string(),
            },
            Self::ProductNotFound(_) => "Product not found".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Whether the failure is the caller's doing rather than the store's.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::InvalidCredentials)
                | Self::Checkout(
                    CheckoutError::LoginRequired
                        | CheckoutError::InvalidQuantity
                        | CheckoutError::UnknownAddress(_)
                )
                | Self::Quote(QuoteError::Invalid(_))
                | Self::ProductNotFound(_)
                | Self::BadRequest(_)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quote::QuoteRequest;

    #[test]
    fn test_app_error_display() {
        let err = AppError::ProductNotFound(ProductId::new(99));
        assert_eq!(err.to_string(), "Product not found: 99");

        let err = AppError::BadRequest("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be a number");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::from(StorageError::Poisoned);
        assert_eq!(err.user_message(), "Your changes could not be saved");
        assert!(!err.is_user_error());

        let err = AppError::from(AuthError::Storage(StorageError::Poisoned));
        assert!(!err.user_message().contains("poisoned"));
    }

    #[test]
    fn test_user_errors() {
        let err = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(err.is_user_error());

        let err = AppError::from(CheckoutError::LoginRequired);
        assert_eq!(err.user_message(), "Please log in to buy");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_quote_validation_lists_fields() {
        let fields = match QuoteRequest::default().validate() {
            Err(fields) => fields,
            Ok(_) => panic!("blank form should not validate"),
        };
        let err = AppError::from(QuoteError::Invalid(fields));
        assert_eq!(
            err.user_message(),
            "Full name is required; Email is required; Phone number is required"
        );
    }
}
