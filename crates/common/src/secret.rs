//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the JWT shared secret. Any
//! struct that derives `Debug` and holds a `SecretString` prints
//! `[REDACTED]` in place of the value, so config structs can be logged
//! freely.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningConfig {
//!     issuer: String,
//!     secret_key: SecretString,
//! }
//!
//! let config = SigningConfig {
//!     issuer: "https://issuer.example.com".to_string(),
//!     secret_key: SecretString::from("hmac-secret"),
//! };
//!
//! assert!(!format!("{config:?}").contains("hmac-secret"));
//!
//! // Access requires an explicit call
//! let bytes = config.secret_key.expose_secret().as_bytes();
//! assert_eq!(bytes, b"hmac-secret");
//! ```

pub use secrecy::{ExposeSecret, SecretString};
