//! Masterpass wallet gateway integration
//!
//! This crate provides the HTTP client for the Masterpass checkout API and
//! the [`MasterpassGateway`] trait the checkout workflow is written against.
//! Wire types mirror the provider's camelCase JSON; error responses are
//! decoded into structured entries so callers can log every field.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

#[cfg(test)]
mod client_test;

pub use client::HttpMasterpassGateway;
pub use error::{log_gateway_error, GatewayError, GatewayErrorEntry};
pub use gateway::MasterpassGateway;
pub use types::{ExpressCheckoutRequest, PaymentData, PostbackRequest, PrecheckoutData};
