use crate::models::{AuthorizerRequest, AuthorizerResponse};
use crate::services::authorizer_service;
use axum::{extract::State, Json};
use common::jwt::TokenValidator;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub validator: TokenValidator,
}

/// Handle an authorizer invocation
///
/// POST /api/v1/authorize
///
/// Always answers 200 with a policy; a rejected token is a Deny policy, not
/// an HTTP error.
#[tracing::instrument(skip_all, name = "authorizer.handler.authorize")]
pub async fn handle_authorize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthorizerRequest>,
) -> Json<AuthorizerResponse> {
    let decision = authorizer_service::authorize(
        &state.validator,
        request.authorization_header(),
        &request.route_arn,
    );

    Json(AuthorizerResponse::from(decision))
}
