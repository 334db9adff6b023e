//! Test server harnesses for E2E testing
//!
//! Each harness builds the service's real router, binds it to
//! `127.0.0.1:0` and serves it in the background for the life of the test.

use crate::fixtures::{jwt_vars, TEST_ISSUER, TEST_SECRET};
use axum::Router;
use common::jwt::TokenValidator;
use common::secret::SecretString;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use mqtt_bridge::config::BrokerSettings;
use mqtt_bridge::repositories::MessageQueueRepository;
use mqtt_bridge::services::mqtt_client::{BrokerConnector, MqttConnector};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A running service bound to a random local port.
struct RunningServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

async fn serve(app: Router) -> Result<RunningServer, anyhow::Error> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Test server error: {}", e);
        }
    });

    Ok(RunningServer {
        addr,
        _handle: handle,
    })
}

/// Standalone recorder; tests never install a global one.
fn test_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Test harness for spawning the token issuer
///
/// # Example
/// ```rust,ignore
/// let server = TestIssuerServer::spawn().await?;
/// let token = reqwest::get(format!("{}/api/v1/token", server.url()))
///     .await?
///     .text()
///     .await?;
/// ```
pub struct TestIssuerServer {
    server: RunningServer,
    config: token_issuer::config::Config,
}

impl TestIssuerServer {
    /// Spawn an issuer using the fixture secret and issuer
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_expiration(token_issuer::config::DEFAULT_EXPIRATION_MINUTES).await
    }

    /// Spawn an issuer whose tokens live for `minutes`
    pub async fn spawn_with_expiration(minutes: u32) -> Result<Self, anyhow::Error> {
        let mut vars = jwt_vars();
        vars.insert(
            token_issuer::config::JWT_EXPIRATION_MINUTES_VAR.to_string(),
            minutes.to_string(),
        );
        let config = token_issuer::config::Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Invalid issuer test config: {}", e))?;

        let state = Arc::new(token_issuer::handlers::token_handler::AppState {
            config: config.clone(),
        });
        let app = token_issuer::routes::build_routes(state, test_metrics_handle());

        Ok(Self {
            server: serve(app).await?,
            config,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.server.addr)
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &token_issuer::config::Config {
        &self.config
    }
}

/// Test harness for spawning the token authorizer
pub struct TestAuthorizerServer {
    server: RunningServer,
}

impl TestAuthorizerServer {
    /// Spawn an authorizer trusting the fixture secret and issuer
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_trusting(TEST_SECRET, TEST_ISSUER).await
    }

    /// Spawn an authorizer trusting a specific secret and issuer
    pub async fn spawn_trusting(secret: &str, issuer: &str) -> Result<Self, anyhow::Error> {
        let validator = TokenValidator::hs256(&SecretString::from(secret), issuer);
        let state = Arc::new(token_authorizer::handlers::authorize_handler::AppState { validator });
        let app = token_authorizer::routes::build_routes(state, test_metrics_handle());

        Ok(Self {
            server: serve(app).await?,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.server.addr)
    }
}

/// Test harness for spawning the MQTT bridge
pub struct TestBridgeServer {
    server: RunningServer,
}

impl TestBridgeServer {
    /// Spawn a bridge publishing through the real MQTT client
    pub async fn spawn(settings: BrokerSettings) -> Result<Self, anyhow::Error> {
        let topic = settings.topic.clone();
        Self::spawn_with_connector(Arc::new(MqttConnector::new(settings)), topic).await
    }

    /// Spawn a bridge publishing through any connector (e.g. a mock)
    pub async fn spawn_with_connector(
        connector: Arc<dyn BrokerConnector>,
        topic: Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(mqtt_bridge::handlers::publish_handler::AppState {
            repository: MessageQueueRepository::new(connector, topic),
        });
        let app = mqtt_bridge::routes::build_routes(state, test_metrics_handle());

        Ok(Self {
            server: serve(app).await?,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.server.addr)
    }
}
