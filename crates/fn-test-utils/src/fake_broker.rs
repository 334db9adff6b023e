//! In-process fake MQTT broker
//!
//! Speaks just enough MQTT 3.1.1 for a client that connects, publishes and
//! disconnects: CONNECT/CONNACK, PUBLISH/PUBACK, PINGREQ/PINGRESP and
//! DISCONNECT. Every PUBLISH is recorded for assertions.

use mqtt_bridge::config::BrokerSettings;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// Control packet types (high nibble of the fixed header)
const CONNECT: u8 = 1;
const PUBLISH: u8 = 3;
const PINGREQ: u8 = 12;
const DISCONNECT: u8 = 14;

const CONNACK_ACCEPTED: u8 = 0x00;
const CONNACK_NOT_AUTHORIZED: u8 = 0x05;

/// How the broker treats each connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Accept,
    Refuse,
    /// Accept, then close the socket on PUBLISH without a PUBACK.
    DropOnPublish,
}

/// A PUBLISH received by the fake broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: u8,
    pub retain: bool,
}

#[derive(Default)]
struct BrokerState {
    messages: Mutex<Vec<ReceivedMessage>>,
    connections: AtomicUsize,
    disconnects: AtomicUsize,
}

/// Fake broker bound to a random local port
///
/// # Example
/// ```rust,ignore
/// let broker = FakeBroker::start().await?;
/// let settings = broker.settings("devices/in");
/// // ... publish through the bridge ...
/// assert_eq!(broker.messages().len(), 1);
/// ```
pub struct FakeBroker {
    addr: SocketAddr,
    state: Arc<BrokerState>,
    _handle: JoinHandle<()>,
}

impl FakeBroker {
    /// Start a broker that accepts every connection
    pub async fn start() -> Result<Self, anyhow::Error> {
        Self::start_with(Behavior::Accept).await
    }

    /// Start a broker that refuses every connection (CONNACK code 5)
    pub async fn start_refusing() -> Result<Self, anyhow::Error> {
        Self::start_with(Behavior::Refuse).await
    }

    /// Start a broker that records each PUBLISH, then closes the connection
    /// without acknowledging it
    pub async fn start_dropping_publishes() -> Result<Self, anyhow::Error> {
        Self::start_with(Behavior::DropOnPublish).await
    }

    async fn start_with(behavior: Behavior) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind fake broker: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let state = Arc::new(BrokerState::default());
        let accept_state = Arc::clone(&state);

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, &state, behavior).await {
                        eprintln!("Fake broker connection error: {}", e);
                    }
                });
            }
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bridge broker settings pointing at this broker
    pub fn settings(&self, topic: &str) -> BrokerSettings {
        BrokerSettings {
            address: Some(self.addr.ip().to_string()),
            port: Some(self.addr.port().to_string()),
            topic: Some(topic.to_string()),
        }
    }

    /// Messages received so far, in arrival order
    pub fn messages(&self) -> Vec<ReceivedMessage> {
        self.state
            .messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Number of CONNECT packets received
    pub fn connection_count(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Number of DISCONNECT packets received
    pub fn disconnect_count(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    state: &BrokerState,
    behavior: Behavior,
) -> io::Result<()> {
    let connack_code = if behavior == Behavior::Refuse {
        CONNACK_NOT_AUTHORIZED
    } else {
        CONNACK_ACCEPTED
    };

    while let Some((header, body)) = read_packet(&mut stream).await? {
        match header >> 4 {
            CONNECT => {
                state.connections.fetch_add(1, Ordering::SeqCst);
                stream.write_all(&[0x20, 0x02, 0x00, connack_code]).await?;
                if connack_code != CONNACK_ACCEPTED {
                    return Ok(());
                }
            }
            PUBLISH => {
                let (message, packet_id) = parse_publish(header, &body)?;
                if let Ok(mut messages) = state.messages.lock() {
                    messages.push(message);
                }
                if behavior == Behavior::DropOnPublish {
                    return Ok(());
                }
                if let Some([hi, lo]) = packet_id {
                    stream.write_all(&[0x40, 0x02, hi, lo]).await?;
                }
            }
            PINGREQ => stream.write_all(&[0xD0, 0x00]).await?,
            DISCONNECT => {
                state.disconnects.fetch_add(1, Ordering::SeqCst);
                return Ok(());
            }
            _ => {}
        }
    }

    Ok(())
}

/// Read one control packet. `None` on a clean EOF between packets.
async fn read_packet(stream: &mut TcpStream) -> io::Result<Option<(u8, Vec<u8>)>> {
    let header = match stream.read_u8().await {
        Ok(byte) => byte,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };

    // Remaining length: up to four 7-bit groups, least significant first
    let mut remaining = 0usize;
    let mut shift = 0u32;
    loop {
        let byte = stream.read_u8().await?;
        remaining |= usize::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift > 21 {
            return Err(invalid("remaining length too long"));
        }
    }

    let mut body = vec![0u8; remaining];
    stream.read_exact(&mut body).await?;

    Ok(Some((header, body)))
}

fn parse_publish(header: u8, body: &[u8]) -> io::Result<(ReceivedMessage, Option<[u8; 2]>)> {
    let qos = (header >> 1) & 0x03;
    let retain = header & 0x01 == 0x01;

    let topic_len = body
        .get(..2)
        .map(|b| usize::from(u16::from_be_bytes([b[0], b[1]])))
        .ok_or_else(|| invalid("truncated topic length"))?;
    let topic = body
        .get(2..2 + topic_len)
        .ok_or_else(|| invalid("truncated topic"))?;
    let topic = String::from_utf8(topic.to_vec()).map_err(|_| invalid("topic is not UTF-8"))?;

    let mut offset = 2 + topic_len;
    let packet_id = if qos > 0 {
        let id = body
            .get(offset..offset + 2)
            .map(|b| [b[0], b[1]])
            .ok_or_else(|| invalid("truncated packet id"))?;
        offset += 2;
        Some(id)
    } else {
        None
    };

    let payload = body.get(offset..).unwrap_or_default().to_vec();

    Ok((
        ReceivedMessage {
            topic,
            payload,
            qos,
            retain,
        },
        packet_id,
    ))
}

fn invalid(reason: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, reason.to_string())
}
