//! Fixed test configuration
//!
//! Every harness and builder uses these values so tokens minted in one place
//! validate in another.

use common::config::{JWT_ISSUER_VAR, JWT_SECRET_KEY_VAR};
use std::collections::HashMap;

// JWT configuration
pub const TEST_SECRET: &str = "test-secret-do-not-use-in-production";
pub const TEST_ISSUER: &str = "https://issuer.test.example.com";

// Wrong values for negative tests
pub const WRONG_SECRET: &str = "some-other-secret";
pub const WRONG_ISSUER: &str = "https://someone-else.example.com";
pub const WRONG_AUDIENCE: &str = "api.someone-else.com";

// Authorizer
pub const TEST_ROUTE_ARN: &str =
    "arn:aws:execute-api:us-east-1:123456789012:abcdef1234/prod/POST/publish";

// MQTT
pub const TEST_TOPIC: &str = "edge/test/messages";

/// Environment map carrying the test JWT settings.
pub fn jwt_vars() -> HashMap<String, String> {
    HashMap::from([
        (JWT_SECRET_KEY_VAR.to_string(), TEST_SECRET.to_string()),
        (JWT_ISSUER_VAR.to_string(), TEST_ISSUER.to_string()),
    ])
}
