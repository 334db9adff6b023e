use crate::errors::IssuerError;
use common::jwt::TokenClaims;
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::instrument;

/// Sign claims with HMAC-SHA256 using the shared secret.
///
/// The header is `{"alg":"HS256","typ":"JWT"}`; the secret is used as its
/// UTF-8 bytes, which is what the authorizer's `DecodingKey` expects.
#[instrument(skip_all)]
pub fn sign_token(claims: &TokenClaims, secret: &SecretString) -> Result<String, IssuerError> {
    let encoding_key = EncodingKey::from_secret(secret.expose_secret().as_bytes());

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    let token = encode(&header, claims, &encoding_key)
        .map_err(|e| IssuerError::Crypto(format!("JWT signing operation failed: {}", e)))?;

    Ok(token)
}
