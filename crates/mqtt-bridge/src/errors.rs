use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body of every failed publish response.
pub const FAILURE_BODY: &str = "error";

/// Why a publish did not complete.
///
/// The `String` payloads carry detail for logs only; clients always see the
/// same generic failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Request has no body")]
    MissingBody,

    #[error("Request body is not valid UTF-8")]
    InvalidBody,

    #[error("Broker configuration error: {0}")]
    Configuration(String),

    #[error("Failed to connect to broker: {0}")]
    Connect(String),

    #[error("Failed to publish message: {0}")]
    Publish(String),

    #[error("Failed to disconnect from broker: {0}")]
    Disconnect(String),
}

impl BridgeError {
    /// Lifecycle stage the error happened in, for logs and metric labels.
    pub fn stage(&self) -> &'static str {
        match self {
            BridgeError::MissingBody | BridgeError::InvalidBody => "request",
            BridgeError::Configuration(_) => "configuration",
            BridgeError::Connect(_) => "connect",
            BridgeError::Publish(_) => "publish",
            BridgeError::Disconnect(_) => "disconnect",
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_BODY).into_response()
    }
}
