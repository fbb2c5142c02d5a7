//! Error types for the Masterpass gateway client

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// One structured error entry from the provider's error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayErrorEntry {
    pub source: String,
    pub reason_code: String,
    pub description: String,
    /// Whether the provider considers the failure retryable. The gateway
    /// client never retries; the caller decides what to do with this.
    pub recoverable: bool,
}

/// Masterpass gateway error types.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider returned an error response with structured entries
    #[error("gateway returned an error response (status {status_code}, {} entries)", .entries.len())]
    Api {
        status_code: u16,
        entries: Vec<GatewayErrorEntry>,
    },

    /// A gateway call exceeded the configured deadline
    #[error("gateway call exceeded the configured deadline")]
    Timeout,

    /// The HTTP request itself failed
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider's response could not be parsed
    #[error("failed to parse gateway response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing or incomplete gateway configuration
    #[error("gateway configuration missing or incomplete")]
    Config,
}

/// Logs a gateway error with full structured detail.
///
/// Each provider error entry becomes its own event so the fields stay
/// queryable. The error itself is left untouched; callers re-raise it
/// unchanged after logging.
pub fn log_gateway_error(err: &GatewayError) {
    match err {
        GatewayError::Api {
            status_code,
            entries,
        } => {
            for entry in entries {
                error!(
                    status_code = *status_code,
                    source = %entry.source,
                    reason_code = %entry.reason_code,
                    description = %entry.description,
                    recoverable = entry.recoverable,
                    "error reported by wallet gateway"
                );
            }
        }
        other => error!(error = %other, "wallet gateway call failed"),
    }
}
