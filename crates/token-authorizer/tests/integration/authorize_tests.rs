//! Authorizer decisions over HTTP
//!
//! Every case must answer 200 with a policy; only the effect and principal
//! change.

use common::jwt::AUDIENCE;
use fn_test_utils::{
    PolicyAssertions, TestAuthorizerServer, TestTokenBuilder, TEST_ROUTE_ARN, WRONG_AUDIENCE,
    WRONG_ISSUER, WRONG_SECRET,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn authorize(server: &TestAuthorizerServer, event: Value) -> Result<Value, anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/authorize", server.url()))
        .json(&event)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(response.json().await?)
}

fn event_with_header(value: &str) -> Value {
    json!({
        "type": "REQUEST",
        "routeArn": TEST_ROUTE_ARN,
        "headers": { "authorization": value },
    })
}

#[tokio::test]
async fn test_valid_token_is_allowed() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let body = authorize(
        &server,
        event_with_header(&TestTokenBuilder::new().for_name("alice").build_bearer()),
    )
    .await?;

    body.assert_policy("Allow", "alice", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_token_with_only_core_claims_is_allowed() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .without_claim("nbf")
        .without_claim("email")
        .build_bearer();

    let body = authorize(&server, event_with_header(&token)).await?;

    body.assert_policy("Allow", "Raymond", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_audience_list_containing_expected_is_allowed() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .with_audiences(&[WRONG_AUDIENCE, AUDIENCE])
        .build_bearer();

    let body = authorize(&server, event_with_header(&token)).await?;

    body.assert_policy("Allow", "Raymond", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_missing_header_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let body = authorize(&server, json!({ "routeArn": TEST_ROUTE_ARN })).await?;

    body.assert_policy("Deny", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_empty_header_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let body = authorize(&server, event_with_header("")).await?;

    body.assert_policy("Deny", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_broken_tokens_are_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let broken = [
        ("wrong secret", TestTokenBuilder::new().signed_with(WRONG_SECRET)),
        ("wrong issuer", TestTokenBuilder::new().with_issuer(WRONG_ISSUER)),
        ("wrong audience", TestTokenBuilder::new().with_audience(WRONG_AUDIENCE)),
        (
            "audience list without ours",
            TestTokenBuilder::new().with_audiences(&[WRONG_AUDIENCE]),
        ),
        ("expired", TestTokenBuilder::new().expires_in(-60)),
        ("not yet valid", TestTokenBuilder::new().not_before_in(3600)),
        ("no exp", TestTokenBuilder::new().without_claim("exp")),
    ];

    for (case, builder) in broken {
        let body = authorize(&server, event_with_header(&builder.build_bearer())).await?;
        assert_eq!(
            body["policyDocument"]["Statement"][0]["Effect"], "Deny",
            "{case} should be denied"
        );
        assert_eq!(body["principalId"], "unauthorized", "{case}");
    }

    Ok(())
}

#[tokio::test]
async fn test_garbage_header_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let body = authorize(&server, event_with_header("Basic dXNlcjpwYXNz")).await?;

    body.assert_policy("Deny", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_oversized_token_is_denied() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;
    let huge = format!("Bearer {}", "a".repeat(9000));

    let body = authorize(&server, event_with_header(&huge)).await?;

    body.assert_policy("Deny", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}

#[tokio::test]
async fn test_token_without_name_is_allowed_as_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthorizerServer::spawn().await?;

    let body = authorize(
        &server,
        event_with_header(&TestTokenBuilder::new().without_name().build_bearer()),
    )
    .await?;

    body.assert_policy("Allow", "unauthorized", TEST_ROUTE_ARN);

    Ok(())
}
