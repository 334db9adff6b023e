//! # Edge Function Test Utilities
//!
//! Shared test utilities for the token issuer, token authorizer and MQTT
//! bridge services.
//!
//! This crate provides:
//! - Fixed test configuration (secret, issuer, topics)
//! - Token builders for valid and deliberately broken tokens
//! - Server test harnesses (TestIssuerServer, TestAuthorizerServer, TestBridgeServer)
//! - An in-process fake MQTT broker (FakeBroker)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fn_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let broker = FakeBroker::start().await?;
//!     let bridge = TestBridgeServer::spawn(broker.settings(TEST_TOPIC)).await?;
//!
//!     reqwest::Client::new()
//!         .post(format!("{}/api/v1/publish", bridge.url()))
//!         .body("hello")
//!         .send()
//!         .await?;
//!
//!     assert_eq!(broker.messages()[0].payload, b"hello");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fake_broker;
pub mod fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use fake_broker::*;
pub use fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
