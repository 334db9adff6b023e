use crate::config::Config;
use crate::crypto;
use crate::errors::IssuerError;
use chrono::Utc;
use common::jwt::TokenClaims;
use tracing::instrument;

/// Subject name carried by every issued token.
pub const DEMO_SUBJECT_NAME: &str = "Raymond";

/// Subject email carried by every issued token.
pub const DEMO_SUBJECT_EMAIL: &str = "me@example.com";

/// Issue a token for the demo subject, valid from now for the configured
/// number of minutes.
#[instrument(skip_all, name = "issuer.service.issue_token")]
pub fn issue_token(config: &Config) -> Result<String, IssuerError> {
    issue_token_at(config, Utc::now().timestamp())
}

/// Issue a token as if the current time were `now` (Unix epoch seconds).
pub fn issue_token_at(config: &Config, now: i64) -> Result<String, IssuerError> {
    let claims = TokenClaims::new(
        DEMO_SUBJECT_NAME,
        DEMO_SUBJECT_EMAIL,
        &config.jwt.issuer,
        now,
        config.token_lifetime_secs(),
    );

    let token = crypto::sign_token(&claims, &config.jwt.secret_key)?;

    tracing::debug!(
        target: "issuer.service.token",
        iat = now,
        exp = claims.exp,
        "Token issued"
    );

    Ok(token)
}
