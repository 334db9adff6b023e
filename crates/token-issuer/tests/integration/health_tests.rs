//! Operational endpoint tests

use fn_test_utils::server_harness::TestIssuerServer;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoint() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404() -> Result<(), anyhow::Error> {
    let server = TestIssuerServer::spawn().await?;

    let response = reqwest::get(format!("{}/api/v1/nothing", server.url())).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
