//! MQTT Bridge Service Library
//!
//! Accepts an HTTP request body and republishes it, unchanged, as a retained
//! at-least-once message on a configured broker topic.
//!
//! # Modules
//!
//! - `config` - Service and broker configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `observability` - Metrics
//! - `repositories` - Message queue writes
//! - `routes` - Router construction
//! - `services` - MQTT client

pub mod config;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
