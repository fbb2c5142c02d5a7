use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources are layered in order: `config/default`, `config/{RUN_ENV}`
/// (both optional), then `WALLETFLOW`-prefixed environment variables with
/// `__` as the section separator (e.g. `WALLETFLOW_DATABASE__URL`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("WALLETFLOW").separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the `.env` file is loaded into the environment exactly once.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        dotenv::dotenv().ok();
    });
}
