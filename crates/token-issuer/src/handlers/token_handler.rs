use crate::config::Config;
use crate::errors::IssuerError;
use crate::observability::metrics::record_token_issuance;
use crate::services::token_service;
use axum::extract::State;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Handle token request
///
/// GET|POST /api/v1/token
///
/// The request itself is ignored; the body of a 200 response is the token.
#[tracing::instrument(skip_all, name = "issuer.handler.token")]
pub async fn handle_issue_token(State(state): State<Arc<AppState>>) -> Result<String, IssuerError> {
    let start = Instant::now();

    let result = token_service::issue_token(&state.config);

    match &result {
        Ok(_) => record_token_issuance("success", start.elapsed()),
        Err(e) => {
            tracing::error!(target: "issuer.handler.token", error = %e, "Token issuance failed");
            record_token_issuance("error", start.elapsed());
        }
    }

    result
}
