//! Domain models for storefront.
//!
//! Records that are injected (addresses) or persisted (login state) but have
//! no behavior of their own beyond reading and writing.

pub mod address;
pub mod session;

pub use address::Address;
pub use session::AuthState;
