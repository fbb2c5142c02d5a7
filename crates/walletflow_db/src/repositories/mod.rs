//! Repository modules for database access
//!
//! Each entity gets a trait defining its operations plus a SQL
//! implementation over the shared [`DbClient`](crate::DbClient).

pub mod checkout_record;
pub mod checkout_record_sql;
pub mod order;
pub mod order_sql;
pub mod pairing;
pub mod pairing_sql;
pub mod wallet;
pub mod wallet_sql;

pub use checkout_record::{CheckoutRecordRepository, ExpressCheckoutRecord, PrecheckoutRecord};
pub use checkout_record_sql::SqlCheckoutRecordRepository;
pub use order::{Order, OrderRepository};
pub use order_sql::SqlOrderRepository;
pub use pairing::{PairingRecord, PairingRepository, PairingSource};
pub use pairing_sql::SqlPairingRepository;
pub use wallet::{Wallet, WalletRepository};
pub use wallet_sql::SqlWalletRepository;
