//! Checkout workflow orchestration for Walletflow
//!
//! Ties the persistence repositories and the Masterpass gateway together
//! into the pairing and checkout workflow: token rotation, precheckout,
//! express checkout, and the final payment postback.

pub mod error;
pub mod service;

pub use error::CheckoutError;
pub use service::CheckoutService;
