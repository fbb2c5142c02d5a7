use serde::{Deserialize, Serialize};

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. DATABASE_URL loaded via WALLETFLOW_DATABASE__URL
}

// --- Masterpass Config ---
// Holds non-secret gateway config. API credentials are loaded by the
// deployment directly from env vars, never from config files.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MasterpassConfig {
    pub base_url: String, // Mandatory
    /// Merchant checkout identifier, sent verbatim in every express checkout.
    pub checkout_id: String, // Mandatory
    /// Deadline for each gateway call, in seconds. Defaults to 30.
    pub timeout_secs: Option<u64>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub masterpass: Option<MasterpassConfig>,
}
