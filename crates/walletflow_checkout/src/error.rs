//! Error types for the checkout workflow

use thiserror::Error;
use walletflow_db::DbError;
use walletflow_masterpass::GatewayError;

/// Checkout workflow error types.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no enabled wallet binding
    #[error("user {0} has no enabled wallet")]
    NoActiveWallet(i64),

    /// The user has no active pairing token to start a checkout from
    #[error("user {0} has no active pairing token")]
    NoPairingToken(i64),

    /// The payment carries no transaction id to confirm
    #[error("payment data carries no transaction id")]
    MissingTransactionId,

    /// A wallet gateway call failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A persistence operation failed
    #[error(transparent)]
    Persistence(#[from] DbError),
}
