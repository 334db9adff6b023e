//! Authorizer request/response payloads.
//!
//! The shapes follow the API gateway "REQUEST" authorizer contract: the
//! gateway posts the incoming request's headers and route ARN, and expects a
//! principal plus a single-statement IAM policy back.

use common::jwt::AUTH_HEADER_NAME;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// IAM policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action this authorizer grants or denies.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Authorizer invocation. Fields other than `headers` and `routeArn` are
/// accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub route_arn: String,
}

impl AuthorizerRequest {
    /// Value of the `authorization` header, matched case-insensitively.
    pub fn authorization_header(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(AUTH_HEADER_NAME))
            .map(|(_, value)| value.as_str())
    }
}

/// Policy effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// Outcome of one authorization check. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: Vec<String>,

    #[serde(rename = "Effect")]
    pub effect: Effect,

    #[serde(rename = "Resource")]
    pub resource: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,

    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl From<AuthorizationDecision> for AuthorizerResponse {
    fn from(decision: AuthorizationDecision) -> Self {
        Self {
            principal_id: decision.principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    action: vec![INVOKE_ACTION.to_string()],
                    effect: decision.effect,
                    resource: vec![decision.resource],
                }],
            },
        }
    }
}
