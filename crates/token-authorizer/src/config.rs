use common::config::JwtConfig;
use std::collections::HashMap;
use std::env;

pub use common::config::ConfigError;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub jwt: JwtConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt = JwtConfig::from_vars(vars)?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Config { bind_address, jwt })
    }
}
