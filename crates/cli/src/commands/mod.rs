//! Subcommand handlers.
//!
//! Each handler drives one storefront operation and prints the result to
//! stdout. Logs go to stderr.

#![allow(clippy::print_stdout)]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
