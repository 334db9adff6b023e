//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for issued tokens and authorizer
//! responses.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use serde_json::Value;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Decoded (unverified) token claims
#[derive(Debug, Deserialize)]
struct JwtClaims {
    #[serde(default)]
    pub name: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

fn decode_part<T: for<'de> Deserialize<'de>>(part: &str, what: &str) -> T {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {what}: {e}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("Failed to parse JWT {what}: {e}"))
}

fn claims_of(token: &str) -> JwtClaims {
    let payload = token
        .split('.')
        .nth(1)
        .unwrap_or_else(|| panic!("JWT has no payload segment"));
    decode_part(payload, "payload")
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_name("Raymond")
///     .assert_lifetime_secs(300);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a three-part HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the `name` claim
    fn assert_for_name(&self, name: &str) -> &Self;

    /// Assert the `iss` and `aud` claims
    fn assert_issued_by(&self, issuer: &str, audience: &str) -> &Self;

    /// Assert that `exp - iat` equals `seconds`
    fn assert_lifetime_secs(&self, seconds: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader = decode_part(parts[0], "header");
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        self
    }

    fn assert_for_name(&self, name: &str) -> &Self {
        assert_eq!(claims_of(self).name.as_deref(), Some(name));
        self
    }

    fn assert_issued_by(&self, issuer: &str, audience: &str) -> &Self {
        let claims = claims_of(self);
        assert_eq!(claims.iss, issuer, "Unexpected issuer");
        assert_eq!(claims.aud, audience, "Unexpected audience");
        self
    }

    fn assert_lifetime_secs(&self, seconds: i64) -> &Self {
        let claims = claims_of(self);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Token lifetime mismatch (iat={}, exp={})",
            claims.iat,
            claims.exp
        );
        self
    }
}

/// Custom assertions for authorizer responses
pub trait PolicyAssertions {
    /// Assert effect, principal and resource of the single policy statement
    fn assert_policy(&self, effect: &str, principal: &str, resource: &str) -> &Self;
}

impl PolicyAssertions for Value {
    fn assert_policy(&self, effect: &str, principal: &str, resource: &str) -> &Self {
        assert_eq!(self["principalId"], principal, "Unexpected principal");
        assert_eq!(self["policyDocument"]["Version"], "2012-10-17");

        let statements = self["policyDocument"]["Statement"]
            .as_array()
            .unwrap_or_else(|| panic!("Statement must be an array: {self}"));
        assert_eq!(statements.len(), 1, "Expected exactly one statement");

        let statement = &statements[0];
        assert_eq!(statement["Effect"], effect, "Unexpected effect");
        assert_eq!(statement["Action"][0], "execute-api:Invoke");
        assert_eq!(statement["Resource"][0], resource, "Unexpected resource");

        self
    }
}
