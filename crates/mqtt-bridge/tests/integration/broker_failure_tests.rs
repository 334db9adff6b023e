//! Failures surface as a generic 500 `"error"`

use fn_test_utils::{FakeBroker, TestBridgeServer, TEST_TOPIC};
use mqtt_bridge::config::BrokerSettings;
use reqwest::StatusCode;

async fn publish(bridge: &TestBridgeServer) -> Result<(StatusCode, String), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/publish", bridge.url()))
        .body("hello")
        .send()
        .await?;

    Ok((response.status(), response.text().await?))
}

fn assert_failed(result: (StatusCode, String)) {
    assert_eq!(result.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.1, "error");
}

/// A port nothing is listening on.
async fn closed_port() -> Result<u16, anyhow::Error> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

#[tokio::test]
async fn test_unreachable_broker() -> Result<(), anyhow::Error> {
    let settings = BrokerSettings {
        address: Some("127.0.0.1".to_string()),
        port: Some(closed_port().await?.to_string()),
        topic: Some(TEST_TOPIC.to_string()),
    };
    let bridge = TestBridgeServer::spawn(settings).await?;

    assert_failed(publish(&bridge).await?);

    Ok(())
}

#[tokio::test]
async fn test_broker_refuses_connection() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start_refusing().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    assert_failed(publish(&bridge).await?);
    assert!(broker.messages().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_lost_connection_before_ack_is_not_retried() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start_dropping_publishes().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    assert_failed(publish(&bridge).await?);

    assert_eq!(broker.connection_count(), 1, "No reconnect after a failed publish");
    assert_eq!(broker.messages().len(), 1, "PUBLISH must not be replayed");

    Ok(())
}

#[tokio::test]
async fn test_missing_topic_never_connects() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let mut settings = broker.settings(TEST_TOPIC);
    settings.topic = None;
    let bridge = TestBridgeServer::spawn(settings).await?;

    assert_failed(publish(&bridge).await?);
    assert_eq!(broker.connection_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_non_numeric_port() -> Result<(), anyhow::Error> {
    let settings = BrokerSettings {
        address: Some("127.0.0.1".to_string()),
        port: Some("mqtt".to_string()),
        topic: Some(TEST_TOPIC.to_string()),
    };
    let bridge = TestBridgeServer::spawn(settings).await?;

    assert_failed(publish(&bridge).await?);

    Ok(())
}

#[tokio::test]
async fn test_missing_broker_address() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let mut settings = broker.settings(TEST_TOPIC);
    settings.address = None;
    let bridge = TestBridgeServer::spawn(settings).await?;

    assert_failed(publish(&bridge).await?);
    assert_eq!(broker.connection_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_bridge_keeps_serving_after_failure() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let mut settings = broker.settings(TEST_TOPIC);
    settings.topic = None;
    let bridge = TestBridgeServer::spawn(settings).await?;

    assert_failed(publish(&bridge).await?);

    let health = reqwest::get(format!("{}/health", bridge.url())).await?;
    assert_eq!(health.status(), StatusCode::OK);

    Ok(())
}
