use mqtt_bridge::config::Config;
use mqtt_bridge::handlers::publish_handler::AppState;
use mqtt_bridge::observability::init_metrics_recorder;
use mqtt_bridge::repositories::MessageQueueRepository;
use mqtt_bridge::routes;
use mqtt_bridge::services::mqtt_client::MqttConnector;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mqtt_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MQTT Bridge");

    let config = Config::from_env();

    // Broker settings are only checked per publish; flag gaps early
    if let Err(e) = config.broker.endpoint() {
        warn!(error = %e, "Broker endpoint is not usable, publishes will fail");
    }
    if config.broker.topic.is_none() {
        warn!("MQTT_TOPIC is not set, publishes will fail");
    }

    info!(
        address = ?config.broker.address,
        port = ?config.broker.port,
        topic = ?config.broker.topic,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let connector = Arc::new(MqttConnector::new(config.broker.clone()));
    let repository = MessageQueueRepository::new(connector, config.broker.topic.clone());
    let state = Arc::new(AppState { repository });
    let app = routes::build_routes(state, metrics_handle);

    info!("MQTT Bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
