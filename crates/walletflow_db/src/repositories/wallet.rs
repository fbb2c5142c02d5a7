//! Repository for per-user wallet bindings
//!
//! A wallet binding holds the user's defaults at the checkout provider
//! (card and shipping address references) plus an enabled flag. The schema
//! enforces at most one enabled wallet per user; the orchestrator treats
//! that wallet as the user's active one.

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// A user's registered digital-wallet binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Option<i64>,
    pub user_id: i64,
    pub default_card_id: String,
    pub default_shipping_address_id: String,
    pub enabled: bool,
}

/// Repository for wallet bindings
pub trait WalletRepository {
    /// Initialize the database schema.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Store a wallet binding.
    fn save(
        &self,
        wallet: Wallet,
    ) -> impl std::future::Future<Output = Result<Wallet, DbError>> + Send;

    /// The user's enabled wallet, if any.
    fn find_enabled_by_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Wallet>, DbError>> + Send;
}
