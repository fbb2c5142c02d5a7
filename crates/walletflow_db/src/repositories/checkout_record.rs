//! Repository for precheckout and express-checkout records
//!
//! Both tables are append-only: every checkout attempt leaves a record, and
//! nothing in the workflow updates or deletes one. They are an audit trail,
//! not a ledger that must mirror the gateway exactly.

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// Locally mirrored result of a precheckout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecheckoutRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    pub wallet_id: i64,
    pub consumer_wallet_id: String,
    pub precheckout_transaction_id: String,
    pub wallet_name: String,
}

/// Locally mirrored result of an express-checkout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressCheckoutRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    pub wallet_id: i64,
    /// Wallet identifier assigned by the gateway, not the local wallet id.
    pub gateway_wallet_id: String,
    pub wallet_name: String,
}

/// Repository for checkout records
pub trait CheckoutRecordRepository {
    /// Initialize the database schema.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Append a precheckout record.
    fn save_precheckout(
        &self,
        record: PrecheckoutRecord,
    ) -> impl std::future::Future<Output = Result<PrecheckoutRecord, DbError>> + Send;

    /// Append an express-checkout record.
    fn save_express_checkout(
        &self,
        record: ExpressCheckoutRecord,
    ) -> impl std::future::Future<Output = Result<ExpressCheckoutRecord, DbError>> + Send;

    /// All precheckout records for a user, oldest first.
    fn find_precheckouts_by_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<PrecheckoutRecord>, DbError>> + Send;

    /// All express-checkout records for a user, oldest first.
    fn find_express_checkouts_by_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ExpressCheckoutRecord>, DbError>> + Send;
}
