use common::jwt::TokenValidator;
use std::net::SocketAddr;
use std::sync::Arc;
use token_authorizer::config::Config;
use token_authorizer::handlers::authorize_handler::AppState;
use token_authorizer::observability::init_metrics_recorder;
use token_authorizer::routes;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_authorizer=debug,common=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Token Authorizer");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(issuer = %config.jwt.issuer, "Configuration loaded successfully");

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let validator = TokenValidator::hs256(&config.jwt.secret_key, &config.jwt.issuer);
    let state = Arc::new(AppState { validator });
    let app = routes::build_routes(state, metrics_handle);

    info!("Token Authorizer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
