//! The gateway seam the orchestrator depends on
//!
//! The checkout workflow consumes these three remote operations and nothing
//! else from the provider. Keeping them behind a trait lets tests script
//! gateway behavior without a network.

use crate::error::GatewayError;
use crate::types::{ExpressCheckoutRequest, PaymentData, PostbackRequest, PrecheckoutData};

/// The wallet provider's checkout API.
pub trait MasterpassGateway: Send + Sync {
    /// Reserve a transaction context for the given pairing token.
    fn fetch_precheckout_data(
        &self,
        pairing_token: &str,
    ) -> impl std::future::Future<Output = Result<PrecheckoutData, GatewayError>> + Send;

    /// Execute payment authorization against a precheckout context.
    fn create_express_checkout(
        &self,
        request: &ExpressCheckoutRequest,
    ) -> impl std::future::Future<Output = Result<PaymentData, GatewayError>> + Send;

    /// Report the final payment outcome back to the provider.
    fn submit_postback(
        &self,
        request: &PostbackRequest,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;
}
