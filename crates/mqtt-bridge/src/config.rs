use crate::errors::BridgeError;
use std::collections::HashMap;
use std::env;

pub const MQTT_BROKER_ADDRESS_VAR: &str = "MQTT_BROKER_ADDRESS";
pub const MQTT_BROKER_PORT_VAR: &str = "MQTT_BROKER_PORT";
pub const MQTT_TOPIC_VAR: &str = "MQTT_TOPIC";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8082";

/// Broker coordinates as read from the environment.
///
/// Nothing here is validated at startup: a missing or malformed value only
/// fails the publish that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerSettings {
    pub address: Option<String>,
    pub port: Option<String>,
    pub topic: Option<String>,
}

impl BrokerSettings {
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self {
            address: non_empty(vars, MQTT_BROKER_ADDRESS_VAR),
            port: non_empty(vars, MQTT_BROKER_PORT_VAR),
            topic: non_empty(vars, MQTT_TOPIC_VAR),
        }
    }

    /// Broker host and port for a new connection.
    ///
    /// # Errors
    ///
    /// `BridgeError::Configuration` if either value is absent or the port is
    /// not a valid TCP port number.
    pub fn endpoint(&self) -> Result<(String, u16), BridgeError> {
        let address = self
            .address
            .clone()
            .ok_or_else(|| missing(MQTT_BROKER_ADDRESS_VAR))?;

        let port = self
            .port
            .as_deref()
            .ok_or_else(|| missing(MQTT_BROKER_PORT_VAR))?
            .parse::<u16>()
            .map_err(|e| BridgeError::Configuration(format!("{MQTT_BROKER_PORT_VAR}: {e}")))?;

        Ok((address, port))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub broker: BrokerSettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Config {
            bind_address,
            broker: BrokerSettings::from_vars(vars),
        }
    }
}

fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name).filter(|v| !v.is_empty()).cloned()
}

fn missing(name: &str) -> BridgeError {
    BridgeError::Configuration(format!("{name} is not set"))
}
