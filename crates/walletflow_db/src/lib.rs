//! Persistence layer for Walletflow
//!
//! This crate provides a database client over SQLx's `Any` driver plus the
//! repositories the checkout workflow needs: pairing tokens, precheckout
//! and express-checkout records, wallet bindings, and order lookups.
//! SQLite is the default backend; PostgreSQL and MySQL are available
//! through feature flags.

pub mod client;
pub mod error;
pub mod repositories;

pub use client::{DbClient, DbTransaction};
pub use error::DbError;

pub use repositories::{
    CheckoutRecordRepository, ExpressCheckoutRecord, Order, OrderRepository, PairingRecord,
    PairingRepository, PairingSource, PrecheckoutRecord, SqlCheckoutRecordRepository,
    SqlOrderRepository, SqlPairingRepository, SqlWalletRepository, Wallet, WalletRepository,
};
