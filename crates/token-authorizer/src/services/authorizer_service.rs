use crate::models::{AuthorizationDecision, Effect};
use crate::observability::metrics::record_authorization;
use common::jwt::{extract_bearer_token, TokenValidator};
use tracing::instrument;

/// Principal reported for every denied request.
pub const UNAUTHORIZED_PRINCIPAL: &str = "unauthorized";

/// Decide whether the bearer token in `header_value` may invoke `route_arn`.
///
/// Never fails: every validation problem becomes a Deny for the
/// `"unauthorized"` principal. The specific reason is only logged.
#[instrument(skip_all, name = "authorizer.service.authorize")]
pub fn authorize(
    validator: &TokenValidator,
    header_value: Option<&str>,
    route_arn: &str,
) -> AuthorizationDecision {
    if header_value.map_or(true, str::is_empty) {
        tracing::info!(
            target: "authorizer.service",
            "Authorization header is missing or empty"
        );
    }

    let token = extract_bearer_token(header_value);

    match validator.validate(token) {
        Ok(claims) => {
            let principal_id = claims
                .name
                .unwrap_or_else(|| UNAUTHORIZED_PRINCIPAL.to_string());

            tracing::info!(
                target: "authorizer.service",
                principal = %principal_id,
                "Token validation succeeded"
            );
            record_authorization(Effect::Allow, None);

            AuthorizationDecision {
                principal_id,
                effect: Effect::Allow,
                resource: route_arn.to_string(),
            }
        }
        Err(e) => {
            tracing::debug!(
                target: "authorizer.service",
                reason = e.reason(),
                "Token rejected"
            );
            record_authorization(Effect::Deny, Some(e.reason()));

            AuthorizationDecision {
                principal_id: UNAUTHORIZED_PRINCIPAL.to_string(),
                effect: Effect::Deny,
                resource: route_arn.to_string(),
            }
        }
    }
}
