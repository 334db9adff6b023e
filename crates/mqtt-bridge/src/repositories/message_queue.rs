use crate::errors::BridgeError;
use crate::services::mqtt_client::{BrokerConnector, PublishMessage};
use std::sync::Arc;
use tracing::instrument;

/// Writes request payloads to the configured broker topic.
pub struct MessageQueueRepository {
    connector: Arc<dyn BrokerConnector>,
    topic: Option<String>,
}

impl MessageQueueRepository {
    pub fn new(connector: Arc<dyn BrokerConnector>, topic: Option<String>) -> Self {
        Self { connector, topic }
    }

    /// Publish `payload` as a retained at-least-once message.
    ///
    /// `None` means the request carried no body at all and fails without
    /// touching the broker. `Some("")` is published as a zero-length
    /// message.
    ///
    /// # Errors
    ///
    /// - `BridgeError::MissingBody` - no payload
    /// - `BridgeError::Configuration` - topic or broker endpoint not set
    /// - `BridgeError::Connect` / `Publish` / `Disconnect` - broker failure
    #[instrument(skip_all, name = "bridge.repository.write_to_queue")]
    pub async fn write_to_queue(&self, payload: Option<&str>) -> Result<(), BridgeError> {
        let payload = payload.ok_or(BridgeError::MissingBody)?;

        let topic = self
            .topic
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BridgeError::Configuration("MQTT_TOPIC is not set".to_string()))?;

        let mut session = self.connector.connect().await?;

        if let Err(e) = session
            .publish(PublishMessage::retained(topic, payload.as_bytes()))
            .await
        {
            // Best effort; the publish error is what gets reported
            if let Err(disconnect_err) = session.disconnect().await {
                tracing::debug!(
                    target: "bridge.repository",
                    error = %disconnect_err,
                    "Disconnect after failed publish also failed"
                );
            }
            return Err(e);
        }

        session.disconnect().await?;

        tracing::info!(
            target: "bridge.repository",
            topic = %topic,
            payload_len = payload.len(),
            "Message published"
        );

        Ok(())
    }
}
