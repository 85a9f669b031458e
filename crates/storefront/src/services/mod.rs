//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login against the injected credential table
//! - `checkout` - Simulated "buy now" with delivery estimate
//! - `quote` - Business quote requests with a persisted draft
//! - `theme` - Light/dark/auto preference
//!
//! Each service borrows the store (and whatever fixtures it needs) from
//! [`AppState`](crate::state::AppState) for the duration of a call.

pub mod auth;
pub mod checkout;
pub mod quote;
pub mod theme;

pub use auth::{AuthError, AuthService, CredentialTable};
pub use checkout::{CheckoutError, CheckoutService, DeliveryWindow, OrderConfirmation};
pub use quote::{FieldErrors, QuoteError, QuoteReceipt, QuoteRequest, QuoteService};
pub use theme::{ThemeMode, ThemeService};
