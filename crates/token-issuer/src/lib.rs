//! Token Issuer Service Library
//!
//! Mints HS256-signed JWTs carrying a fixed demo subject.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - JWT signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `observability` - Metrics
//! - `routes` - Router construction
//! - `services` - Token issuance logic

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;
