//! Token Authorizer Service Library
//!
//! Validates bearer tokens minted by the token issuer and answers with an
//! IAM Allow/Deny policy for the requested route.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `handlers` - HTTP request handlers
//! - `models` - Authorizer request and policy payloads
//! - `observability` - Metrics
//! - `routes` - Router construction
//! - `services` - Authorization decision logic

pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
