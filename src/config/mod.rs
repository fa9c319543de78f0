//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the
//! `ORCHESTRATE_GATEWAY` prefix and `__` as the nesting separator.
//!
//! # Example
//!
//! ```no_run
//! use orchestrate_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.socket_addr().expect("Invalid host/port");
//! println!("Server running on {}", addr);
//! ```

mod error;
mod orchestrate;
mod server;

pub use error::{ConfigError, ValidationError};
pub use orchestrate::OrchestrateConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Orchestrate API configuration
    #[serde(default)]
    pub orchestrate: OrchestrateConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables:
    ///
    /// - `ORCHESTRATE_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ORCHESTRATE_GATEWAY__ORCHESTRATE__API_KEY=...` -> `orchestrate.api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ORCHESTRATE_GATEWAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.orchestrate.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ORCHESTRATE_GATEWAY__ORCHESTRATE__API_KEY", "iam-key-xxx");
        env::set_var("ORCHESTRATE_GATEWAY__ORCHESTRATE__INSTANCE_ID", "inst-123");
    }

    fn clear_env() {
        env::remove_var("ORCHESTRATE_GATEWAY__ORCHESTRATE__API_KEY");
        env::remove_var("ORCHESTRATE_GATEWAY__ORCHESTRATE__INSTANCE_ID");
        env::remove_var("ORCHESTRATE_GATEWAY__ORCHESTRATE__REGION");
        env::remove_var("ORCHESTRATE_GATEWAY__SERVER__PORT");
        env::remove_var("ORCHESTRATE_GATEWAY__SERVER__ENVIRONMENT");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.orchestrate.api_key.as_deref(), Some("iam-key-xxx"));
        assert_eq!(config.orchestrate.instance_id.as_deref(), Some("inst-123"));
    }

    #[test]
    fn validates_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn custom_server_port_overrides_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ORCHESTRATE_GATEWAY__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
