//! Shared configuration for the token functions.
//!
//! Both the issuer and the authorizer need the same signing secret and
//! issuer string. Each service's own `Config` embeds a [`JwtConfig`] and
//! reuses [`ConfigError`] for its extra settings.

use crate::secret::SecretString;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the HMAC shared secret.
pub const JWT_SECRET_KEY_VAR: &str = "JWT_SECRET_KEY";

/// Environment variable holding the expected/issued `iss` claim.
pub const JWT_ISSUER_VAR: &str = "JWT_ISSUER";

/// Configuration errors. These are fatal: they abort service startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// JWT signing/validation settings.
///
/// `secret_key` is a [`SecretString`], so deriving `Debug` here is safe.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC-SHA256 secret.
    pub secret_key: SecretString,
    /// Issuer written into (and required from) every token.
    pub issuer: String,
}

impl JwtConfig {
    /// Load JWT settings from a variable map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `JWT_SECRET_KEY` or
    /// `JWT_ISSUER` is absent or empty.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let secret_key = required_var(vars, JWT_SECRET_KEY_VAR)?;
        let issuer = required_var(vars, JWT_ISSUER_VAR)?;

        Ok(Self {
            secret_key: SecretString::from(secret_key),
            issuer,
        })
    }
}

/// Fetch a required variable. Empty values count as missing.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming the variable.
pub fn required_var(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Parse an optional variable, falling back to `default` when unset or empty.
///
/// A value that is present but does not parse is an error rather than a
/// silent fallback.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the variable is set but cannot be
/// parsed as `T`.
pub fn parse_var_or<T>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}
