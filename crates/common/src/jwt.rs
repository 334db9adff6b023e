//! JWT utilities shared by the issuer and the authorizer.
//!
//! This module provides:
//! - The token claim set ([`TokenClaims`])
//! - The fixed audience and size limit constants
//! - Bearer token extraction from a raw `authorization` header value
//! - HS256 token validation ([`TokenValidator`])
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted; the algorithm in the token header cannot
//!   downgrade validation
//! - Expiry is checked with zero leeway
//! - Every rejection renders the same generic message; the specific reason
//!   is only available through [`JwtValidationError::reason`] for logs
//! - The `email` claim is redacted in Debug output

use crate::secret::{ExposeSecret, SecretString};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Audience written into every issued token and required on validation.
pub const AUDIENCE: &str = "api.example.com";

/// Maximum accepted JWT size in bytes (8KB).
///
/// Checked before base64 decoding or signature verification. A token issued
/// by this system is roughly 300 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Prefix stripped (case-insensitively) from the `authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Header carrying the bearer token.
pub const AUTH_HEADER_NAME: &str = "authorization";

// =============================================================================
// Error Types
// =============================================================================

/// Reasons a token can be rejected.
///
/// All variants display the same message so callers cannot leak the reason
/// by accident. Use [`JwtValidationError::reason`] for log fields.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtValidationError {
    /// No token was supplied.
    #[error("The access token is invalid or expired")]
    EmptyToken,

    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Not a decodable HS256 JWT, or a required claim is missing.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Signature does not match the shared secret.
    #[error("The access token is invalid or expired")]
    InvalidSignature,

    /// `iss` does not match the configured issuer.
    #[error("The access token is invalid or expired")]
    InvalidIssuer,

    /// `aud` does not match [`AUDIENCE`].
    #[error("The access token is invalid or expired")]
    InvalidAudience,

    /// `exp` is in the past.
    #[error("The access token is invalid or expired")]
    Expired,

    /// `nbf` is in the future.
    #[error("The access token is invalid or expired")]
    NotYetValid,
}

impl JwtValidationError {
    /// Bounded label describing the rejection, for logs and metrics.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            JwtValidationError::EmptyToken => "empty_token",
            JwtValidationError::TokenTooLarge => "token_too_large",
            JwtValidationError::MalformedToken => "malformed_token",
            JwtValidationError::InvalidSignature => "invalid_signature",
            JwtValidationError::InvalidIssuer => "invalid_issuer",
            JwtValidationError::InvalidAudience => "invalid_audience",
            JwtValidationError::Expired => "expired",
            JwtValidationError::NotYetValid => "not_yet_valid",
        }
    }
}

impl From<&jsonwebtoken::errors::Error> for JwtValidationError {
    fn from(err: &jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::InvalidSignature,
            ErrorKind::ExpiredSignature => JwtValidationError::Expired,
            ErrorKind::ImmatureSignature => JwtValidationError::NotYetValid,
            ErrorKind::InvalidIssuer => JwtValidationError::InvalidIssuer,
            ErrorKind::InvalidAudience => JwtValidationError::InvalidAudience,
            _ => JwtValidationError::MalformedToken,
        }
    }
}

// =============================================================================
// Claims Types
// =============================================================================

/// The `aud` claim: a single audience or a list of audiences.
///
/// Issued tokens always carry a single string. A list is accepted on
/// validation as long as it contains [`AUDIENCE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether `audience` is one of the values carried by the claim.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == audience,
            Audience::Multiple(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

impl From<String> for Audience {
    fn from(aud: String) -> Self {
        Audience::Single(aud)
    }
}

impl From<&str> for Audience {
    fn from(aud: &str) -> Self {
        Audience::Single(aud.to_string())
    }
}

impl PartialEq<&str> for Audience {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Audience::Single(aud) if aud.as_str() == *other)
    }
}

/// Claims carried by an issued token.
///
/// `name` and `email` are optional on the wire: a correctly signed token
/// from the right issuer without a `name` is still valid, it just has no
/// principal name. `iat` and `nbf` are optional too; an `nbf` that is
/// present is still enforced.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject display name, used as the authorizer principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Subject email address - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: Audience,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not-before timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("name", &self.name)
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .finish()
    }
}

impl TokenClaims {
    /// Build claims for a subject issued at `issued_at` and valid for
    /// `lifetime_secs` seconds. The audience is always [`AUDIENCE`].
    #[must_use]
    pub fn new(
        name: &str,
        email: &str,
        issuer: &str,
        issued_at: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            iss: issuer.to_string(),
            aud: Audience::from(AUDIENCE),
            iat: Some(issued_at),
            nbf: Some(issued_at),
            exp: issued_at + lifetime_secs,
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Extract the token from a raw `authorization` header value.
///
/// - A missing header yields an empty token.
/// - A `Bearer ` prefix is stripped case-insensitively and the remainder is
///   trimmed.
/// - Any other value is returned unchanged and left to validation to reject.
#[must_use]
pub fn extract_bearer_token(header_value: Option<&str>) -> &str {
    let value = header_value.unwrap_or_default();

    let has_prefix = value
        .get(..BEARER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX));

    if has_prefix {
        value
            .get(BEARER_PREFIX.len()..)
            .map(str::trim)
            .unwrap_or_default()
    } else {
        value
    }
}

/// HS256 token validator bound to one secret and one issuer.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidator")
            .field("decoding_key", &"[REDACTED]")
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish()
    }
}

impl TokenValidator {
    /// Create a validator that requires signature, issuer, audience and
    /// expiry to check out. `nbf` is optional but enforced when present.
    #[must_use]
    pub fn hs256(secret: &SecretString, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    /// Validate a compact JWT and return its claims.
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing the first failed check.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, JwtValidationError> {
        if token.is_empty() {
            return Err(JwtValidationError::EmptyToken);
        }

        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "common.jwt",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(JwtValidationError::TokenTooLarge);
        }

        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let err = JwtValidationError::from(&e);
                tracing::debug!(
                    target: "common.jwt",
                    reason = err.reason(),
                    error = %e,
                    "Token verification failed"
                );
                err
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
