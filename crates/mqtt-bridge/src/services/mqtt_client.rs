//! MQTT broker client.
//!
//! Every publish runs on its own short-lived connection:
//! `Idle -> Connecting -> Connected -> Publishing -> Disconnecting -> Idle`.
//! A failure at any step ends the call; nothing is retried and no
//! connection is kept between calls.
//!
//! `rumqttc` reconnects and replays unacknowledged publishes whenever its
//! event loop is polled after an error. A session whose event loop has
//! failed is therefore never polled again.
//!
//! The broker is reached through the [`BrokerConnector`] and
//! [`BrokerSession`] traits so the repository can be exercised without a
//! network (see [`mock`]).

use crate::config::BrokerSettings;
use crate::errors::BridgeError;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Prefix of the random client identifier used for every connection.
pub const CLIENT_ID_PREFIX: &str = "MQTTG0-";

/// Capacity of the request channel between `AsyncClient` and its event loop.
/// One publish and one disconnect are the most ever queued.
const REQUEST_CHANNEL_CAPACITY: usize = 10;

/// Largest packet accepted from the broker. Only acknowledgements arrive.
const MAX_INCOMING_PACKET_SIZE: usize = 10 * 1024;

/// Largest packet sent to the broker: the MQTT 3.1.1 remaining-length
/// maximum. The HTTP body limit is what bounds payloads in practice.
const MAX_OUTGOING_PACKET_SIZE: usize = 268_435_455;

/// A message to hand to the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

impl PublishMessage {
    /// At-least-once, retained message.
    pub fn retained(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            qos: QoS::AtLeastOnce,
            retain: true,
        }
    }
}

/// Opens broker connections.
#[async_trait::async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Connect and wait until the broker has accepted the session.
    async fn connect(&self) -> Result<Box<dyn BrokerSession>, BridgeError>;
}

/// One open broker connection.
#[async_trait::async_trait]
pub trait BrokerSession: Send {
    /// Publish and wait for the broker's acknowledgement.
    async fn publish(&mut self, message: PublishMessage) -> Result<(), BridgeError>;

    /// Send DISCONNECT. The session must not be used afterwards.
    async fn disconnect(&mut self) -> Result<(), BridgeError>;
}

/// Generate a fresh client identifier.
pub fn new_client_id() -> String {
    format!("{CLIENT_ID_PREFIX}{}", Uuid::new_v4())
}

/// [`BrokerConnector`] backed by `rumqttc`.
#[derive(Debug, Clone)]
pub struct MqttConnector {
    settings: BrokerSettings,
}

impl MqttConnector {
    pub fn new(settings: BrokerSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl BrokerConnector for MqttConnector {
    #[instrument(skip_all, name = "bridge.mqtt.connect")]
    async fn connect(&self) -> Result<Box<dyn BrokerSession>, BridgeError> {
        let (host, port) = self.settings.endpoint()?;
        let client_id = new_client_id();

        debug!(
            target: "bridge.mqtt",
            host = %host,
            port = port,
            client_id = %client_id,
            "Connecting to broker"
        );

        let mut options = MqttOptions::new(client_id, host, port);
        options.set_max_packet_size(MAX_INCOMING_PACKET_SIZE, MAX_OUTGOING_PACKET_SIZE);
        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);

        // rumqttc surfaces a refused CONNACK as a ConnectionError
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(target: "bridge.mqtt", error = %e, "Broker connection failed");
                    return Err(BridgeError::Connect(e.to_string()));
                }
            }
        }

        debug!(target: "bridge.mqtt", "Broker accepted connection");

        Ok(Box::new(MqttSession {
            client,
            eventloop,
            failed: false,
        }))
    }
}

/// [`BrokerSession`] over a connected `rumqttc` client.
pub struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
    /// Set once the event loop has returned an error.
    failed: bool,
}

#[async_trait::async_trait]
impl BrokerSession for MqttSession {
    #[instrument(skip_all, name = "bridge.mqtt.publish")]
    async fn publish(&mut self, message: PublishMessage) -> Result<(), BridgeError> {
        let payload_len = message.payload.len();

        if let Err(e) = self
            .client
            .publish(message.topic, message.qos, message.retain, message.payload)
            .await
        {
            self.failed = true;
            return Err(BridgeError::Publish(e.to_string()));
        }

        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::PubAck(ack))) => {
                    debug!(
                        target: "bridge.mqtt",
                        pkid = ack.pkid,
                        payload_len = payload_len,
                        "Publish acknowledged"
                    );
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    warn!(target: "bridge.mqtt", error = %e, "Publish failed");
                    return Err(BridgeError::Publish(e.to_string()));
                }
            }
        }
    }

    #[instrument(skip_all, name = "bridge.mqtt.disconnect")]
    async fn disconnect(&mut self) -> Result<(), BridgeError> {
        // Polling again would reconnect; the connection is already gone
        if self.failed {
            debug!(target: "bridge.mqtt", "Session failed, dropping without DISCONNECT");
            return Ok(());
        }

        self.client
            .disconnect()
            .await
            .map_err(|e| BridgeError::Disconnect(e.to_string()))?;

        // Outgoing::Disconnect is reported once the packet has been flushed
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Disconnect)) => return Ok(()),
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    warn!(target: "bridge.mqtt", error = %e, "Disconnect failed");
                    return Err(BridgeError::Disconnect(e.to_string()));
                }
            }
        }
    }
}

/// Mock broker client module for testing.
///
/// This module provides mock implementations of the broker traits for use in
/// tests.
pub mod mock {

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Which step the mock should fail at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailAt {
        Nothing,
        Connect,
        Publish,
        Disconnect,
    }

    /// Mock connector recording every message it is asked to publish.
    pub struct MockConnector {
        fail_at: FailAt,
        connect_count: AtomicUsize,
        disconnect_count: Arc<AtomicUsize>,
        published: Arc<Mutex<Vec<PublishMessage>>>,
    }

    impl MockConnector {
        /// Create a mock where every step succeeds.
        pub fn accepting() -> Self {
            Self::failing_at(FailAt::Nothing)
        }

        /// Create a mock whose connect always fails.
        pub fn failing() -> Self {
            Self::failing_at(FailAt::Connect)
        }

        /// Create a mock that fails at the given step.
        pub fn failing_at(fail_at: FailAt) -> Self {
            Self {
                fail_at,
                connect_count: AtomicUsize::new(0),
                disconnect_count: Arc::new(AtomicUsize::new(0)),
                published: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Get the number of connections opened.
        pub fn connect_count(&self) -> usize {
            self.connect_count.load(Ordering::SeqCst)
        }

        /// Get the number of disconnects sent.
        pub fn disconnect_count(&self) -> usize {
            self.disconnect_count.load(Ordering::SeqCst)
        }

        /// Messages published so far, in order.
        pub fn published(&self) -> Vec<PublishMessage> {
            self.published
                .lock()
                .map(|messages| messages.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait::async_trait]
    impl BrokerConnector for MockConnector {
        async fn connect(&self) -> Result<Box<dyn BrokerSession>, BridgeError> {
            self.connect_count.fetch_add(1, Ordering::SeqCst);

            if self.fail_at == FailAt::Connect {
                return Err(BridgeError::Connect("Mock broker unreachable".to_string()));
            }

            Ok(Box::new(MockSession {
                fail_at: self.fail_at,
                disconnect_count: Arc::clone(&self.disconnect_count),
                published: Arc::clone(&self.published),
            }))
        }
    }

    struct MockSession {
        fail_at: FailAt,
        disconnect_count: Arc<AtomicUsize>,
        published: Arc<Mutex<Vec<PublishMessage>>>,
    }

    #[async_trait::async_trait]
    impl BrokerSession for MockSession {
        async fn publish(&mut self, message: PublishMessage) -> Result<(), BridgeError> {
            if self.fail_at == FailAt::Publish {
                return Err(BridgeError::Publish("Mock publish rejected".to_string()));
            }

            if let Ok(mut published) = self.published.lock() {
                published.push(message);
            }
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<(), BridgeError> {
            self.disconnect_count.fetch_add(1, Ordering::SeqCst);

            if self.fail_at == FailAt::Disconnect {
                return Err(BridgeError::Disconnect("Mock disconnect failed".to_string()));
            }
            Ok(())
        }
    }

}
