//! Issuer → authorizer round trip
//!
//! A token fetched from a running issuer must be honored by an authorizer
//! sharing its secret and issuer, and refused by one that does not.

use fn_test_utils::{
    PolicyAssertions, TestAuthorizerServer, TestIssuerServer, TEST_ISSUER, TEST_ROUTE_ARN,
    WRONG_SECRET,
};
use serde_json::{json, Value};

async fn issue(issuer: &TestIssuerServer) -> Result<String, anyhow::Error> {
    Ok(reqwest::get(format!("{}/api/v1/token", issuer.url()))
        .await?
        .text()
        .await?)
}

async fn authorize(
    authorizer: &TestAuthorizerServer,
    token: &str,
) -> Result<Value, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/api/v1/authorize", authorizer.url()))
        .json(&json!({
            "routeArn": TEST_ROUTE_ARN,
            "headers": { "Authorization": format!("Bearer {token}") },
        }))
        .send()
        .await?
        .json()
        .await?)
}

#[tokio::test]
async fn test_issued_token_is_allowed() -> Result<(), anyhow::Error> {
    let issuer = TestIssuerServer::spawn().await?;
    let authorizer = TestAuthorizerServer::spawn().await?;

    let token = issue(&issuer).await?;
    let body = authorize(&authorizer, &token).await?;

    body.assert_policy("Allow", "Raymond", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_issued_token_is_denied_by_foreign_authorizer() -> Result<(), anyhow::Error> {
    let issuer = TestIssuerServer::spawn().await?;
    let authorizer = TestAuthorizerServer::spawn_trusting(WRONG_SECRET, TEST_ISSUER).await?;

    let token = issue(&issuer).await?;
    let body = authorize(&authorizer, &token).await?;

    body.assert_policy("Deny", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}
