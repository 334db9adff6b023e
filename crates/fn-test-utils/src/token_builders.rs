//! Builder patterns for test token construction
//!
//! Provides a fluent API for minting HS256 tokens, including tokens that are
//! broken in exactly one way.

use crate::fixtures::{TEST_ISSUER, TEST_SECRET};
use chrono::{Duration, Utc};
use common::jwt::AUDIENCE;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};

/// Builder for creating signed test JWTs
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_name("alice")
///     .expires_in(-60)
///     .build();
/// ```
pub struct TestTokenBuilder {
    secret: String,
    claims: Map<String, Value>,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    ///
    /// Defaults match what the token issuer produces with the fixture
    /// configuration: valid now, for five minutes.
    pub fn new() -> Self {
        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("name".to_string(), json!("Raymond"));
        claims.insert("email".to_string(), json!("me@example.com"));
        claims.insert("iss".to_string(), json!(TEST_ISSUER));
        claims.insert("aud".to_string(), json!(AUDIENCE));
        claims.insert("iat".to_string(), json!(now.timestamp()));
        claims.insert("nbf".to_string(), json!(now.timestamp()));
        claims.insert(
            "exp".to_string(),
            json!((now + Duration::seconds(300)).timestamp()),
        );

        Self {
            secret: TEST_SECRET.to_string(),
            claims,
        }
    }

    /// Set the `name` claim
    pub fn for_name(mut self, name: &str) -> Self {
        self.claims.insert("name".to_string(), json!(name));
        self
    }

    /// Remove the `name` claim
    pub fn without_name(mut self) -> Self {
        self.claims.remove("name");
        self
    }

    /// Sign with a different secret
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Set the `iss` claim
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.claims.insert("iss".to_string(), json!(issuer));
        self
    }

    /// Set the `aud` claim
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.claims.insert("aud".to_string(), json!(audience));
        self
    }

    /// Set `aud` to a list of audiences
    pub fn with_audiences(mut self, audiences: &[&str]) -> Self {
        self.claims.insert("aud".to_string(), json!(audiences));
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.insert(
            "exp".to_string(),
            json!((Utc::now() + Duration::seconds(seconds)).timestamp()),
        );
        self
    }

    /// Set not-before in seconds from now
    pub fn not_before_in(mut self, seconds: i64) -> Self {
        self.claims.insert(
            "nbf".to_string(),
            json!((Utc::now() + Duration::seconds(seconds)).timestamp()),
        );
        self
    }

    /// Remove any claim
    pub fn without_claim(mut self, claim: &str) -> Self {
        self.claims.remove(claim);
        self
    }

    /// The claims as a JSON value
    pub fn claims(&self) -> Value {
        Value::Object(self.claims.clone())
    }

    /// Sign the token
    pub fn build(self) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &Value::Object(self.claims),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("HS256 signing of JSON claims cannot fail")
    }

    /// Sign the token and wrap it in a `Bearer` header value
    pub fn build_bearer(self) -> String {
        format!("Bearer {}", self.build())
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
