use common::config::{parse_var_or, JwtConfig};
use std::collections::HashMap;
use std::env;

pub use common::config::ConfigError;

/// Token lifetime used when `JWT_EXPIRATION_MINUTES` is unset.
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 5;

pub const JWT_EXPIRATION_MINUTES_VAR: &str = "JWT_EXPIRATION_MINUTES";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub jwt: JwtConfig,
    pub expiration_minutes: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt = JwtConfig::from_vars(vars)?;

        let expiration_minutes =
            parse_var_or(vars, JWT_EXPIRATION_MINUTES_VAR, DEFAULT_EXPIRATION_MINUTES)?;

        // exp must be strictly after iat
        if expiration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                name: JWT_EXPIRATION_MINUTES_VAR.to_string(),
                reason: "must be at least 1 minute".to_string(),
            });
        }

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Config {
            bind_address,
            jwt,
            expiration_minutes,
        })
    }

    /// Token lifetime in seconds.
    pub fn token_lifetime_secs(&self) -> i64 {
        i64::from(self.expiration_minutes) * 60
    }
}
