//! Repository for wallet pairing tokens
//!
//! A pairing token correlates a local user session with the wallet
//! provider's session. Tokens rotate on every checkout step: all previous
//! tokens for the user are marked wasted before a new one is stored, so at
//! most one token per user is active at any time.

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// The checkout step that produced a pairing token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairingSource {
    Precheckout,
    ExpressCheckout,
}

impl PairingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingSource::Precheckout => "PRECHECKOUT",
            PairingSource::ExpressCheckout => "EXPRESS_CHECKOUT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PRECHECKOUT" => Some(PairingSource::Precheckout),
            "EXPRESS_CHECKOUT" => Some(PairingSource::ExpressCheckout),
            _ => None,
        }
    }
}

/// A stored pairing token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub id: Option<i64>,
    pub pairing_token: String,
    pub source: PairingSource,
    pub user_id: i64,
    pub wallet_id: i64,
    pub wasted: bool,
}

/// Repository for pairing tokens
pub trait PairingRepository {
    /// Initialize the database schema.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Mark every non-wasted token for the user as wasted.
    ///
    /// Idempotent: zero affected rows is not an error. Returns the number of
    /// tokens invalidated.
    fn invalidate_all(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<u64, DbError>> + Send;

    /// Insert a new token with `wasted = false`.
    ///
    /// Returns the stored record with its assigned id.
    fn save(
        &self,
        record: PairingRecord,
    ) -> impl std::future::Future<Output = Result<PairingRecord, DbError>> + Send;

    /// The newest non-wasted token for the user; highest id wins.
    fn find_current(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<PairingRecord>, DbError>> + Send;
}
