//! Publishing through the real MQTT client against the fake broker

use fn_test_utils::{FakeBroker, TestBridgeServer, TEST_TOPIC};
use reqwest::{header, StatusCode};
use std::time::Duration;

async fn publish(
    bridge: &TestBridgeServer,
    body: impl Into<reqwest::Body>,
) -> Result<(StatusCode, String), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/publish", bridge.url()))
        .body(body)
        .send()
        .await?;

    Ok((response.status(), response.text().await?))
}

/// Poll until `condition` holds or a second has passed.
async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..50 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

#[tokio::test]
async fn test_publish_reaches_broker() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    let (status, body) = publish(&bridge, "hello").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let messages = broker.messages();
    assert_eq!(messages.len(), 1);
    let message = messages.first().ok_or_else(|| anyhow::anyhow!("no message"))?;
    assert_eq!(message.topic, TEST_TOPIC);
    assert_eq!(message.payload, b"hello".to_vec());
    assert_eq!(message.qos, 1, "Messages are published at least once");
    assert!(message.retain, "Messages are retained");

    Ok(())
}

#[tokio::test]
async fn test_publish_disconnects_after_ack() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    let (status, _) = publish(&bridge, "hello").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(
        eventually(|| broker.disconnect_count() == 1).await,
        "Bridge should send DISCONNECT after each publish"
    );

    Ok(())
}

#[tokio::test]
async fn test_each_publish_uses_a_new_connection() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    publish(&bridge, "one").await?;
    publish(&bridge, "two").await?;

    assert_eq!(broker.connection_count(), 2);
    let payloads: Vec<_> = broker.messages().into_iter().map(|m| m.payload).collect();
    assert_eq!(payloads, vec![b"one".to_vec(), b"two".to_vec()]);

    Ok(())
}

#[tokio::test]
async fn test_payload_is_forwarded_verbatim() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;
    let payload = "{\"temperature\": 21.5, \"unit\": \"°C\"}\n";

    let (status, _) = publish(&bridge, payload).await?;

    assert_eq!(status, StatusCode::OK);
    let received = broker
        .messages()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no message"))?;
    assert_eq!(received.payload, payload.as_bytes().to_vec());

    Ok(())
}

#[tokio::test]
async fn test_large_payload_is_forwarded() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;
    let payload = "x".repeat(100 * 1024);

    let (status, body) = publish(&bridge, payload.clone()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let received = broker
        .messages()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no message"))?;
    assert_eq!(received.payload.len(), payload.len());
    assert_eq!(broker.connection_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_body_with_content_length_publishes_empty_message(
) -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/publish", bridge.url()))
        .header(header::CONTENT_LENGTH, "0")
        .body("")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let messages = broker.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages.iter().all(|m| m.payload.is_empty()));

    Ok(())
}

#[tokio::test]
async fn test_empty_body_without_content_length_is_missing() -> Result<(), anyhow::Error> {
    let broker = FakeBroker::start().await?;
    let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;

    // reqwest sends no Content-Length for an empty body
    let (status, body) = publish(&bridge, "").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "error");
    assert_eq!(broker.connection_count(), 0);
    assert!(broker.messages().is_empty());

    Ok(())
}
