//! End-to-end token issuance
//!
//! Tokens are fetched over HTTP and checked both structurally and with the
//! same validator the authorizer uses.

use common::jwt::{TokenValidator, AUDIENCE};
use common::secret::SecretString;
use fn_test_utils::{
    TestIssuerServer, TokenAssertions, TEST_ISSUER, TEST_SECRET, WRONG_ISSUER, WRONG_SECRET,
};
use reqwest::StatusCode;

async fn fetch_token(server: &TestIssuerServer) -> Result<String, anyhow::Error> {
    let response = reqwest::get(format!("{}/api/v1/token", server.url())).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(response.text().await?)
}

#[tokio::test]
async fn test_issued_token_carries_demo_subject() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;

    let token = fetch_token(&server).await?;

    token
        .assert_valid_jwt()
        .assert_for_name("Raymond")
        .assert_issued_by(TEST_ISSUER, AUDIENCE)
        .assert_lifetime_secs(300);

    Ok(())
}

#[tokio::test]
async fn test_configured_expiration_is_honored() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn_with_expiration(15).await?;

    let token = fetch_token(&server).await?;

    token.assert_lifetime_secs(15 * 60);
    assert_eq!(server.config().expiration_minutes, 15);

    Ok(())
}

#[tokio::test]
async fn test_post_is_accepted() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/token", server.url()))
        .body("ignored")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    response.text().await?.assert_valid_jwt();

    Ok(())
}

#[tokio::test]
async fn test_token_validates_only_with_matching_secret_and_issuer() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;
    let token = fetch_token(&server).await?;

    let claims = TokenValidator::hs256(&SecretString::from(TEST_SECRET), TEST_ISSUER)
        .validate(&token)
        .map_err(|e| anyhow::anyhow!("Issued token should validate: {}", e))?;
    assert_eq!(claims.email.as_deref(), Some("me@example.com"));
    assert_eq!(claims.nbf, claims.iat);

    assert!(TokenValidator::hs256(&SecretString::from(WRONG_SECRET), TEST_ISSUER)
        .validate(&token)
        .is_err());
    assert!(TokenValidator::hs256(&SecretString::from(TEST_SECRET), WRONG_ISSUER)
        .validate(&token)
        .is_err());

    Ok(())
}
