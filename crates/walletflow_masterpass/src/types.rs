//! Wire types for the Masterpass checkout gateway
//!
//! Field names follow the provider's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of the precheckout call: a reserved transaction context plus a
/// fresh pairing id that replaces the one used to make the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecheckoutData {
    pub pairing_id: String,
    pub consumer_wallet_id: String,
    pub pre_checkout_transaction_id: String,
    pub wallet_name: String,
}

/// Request for the express-checkout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressCheckoutRequest {
    pub amount: f64,
    pub currency: String,
    pub card_id: String,
    pub checkout_id: String,
    pub digital_goods: bool,
    pub pairing_id: String,
    pub pre_checkout_transaction_id: String,
    pub shipping_address_id: String,
}

/// Response of the express-checkout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub wallet_id: String,
    pub wallet_name: String,
    pub pairing_id: String,
    /// The provider returns this as null in this integration; the
    /// orchestrator fills it in from the precheckout response.
    #[serde(default)]
    pub psp_transaction_id: Option<String>,
}

/// Out-of-band confirmation of the final payment outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackRequest {
    pub transaction_id: String,
    pub currency: String,
    pub payment_code: String,
    pub payment_successful: bool,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
}
