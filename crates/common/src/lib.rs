//! Common utilities and types shared across the edge functions.

#![warn(clippy::pedantic)]

/// Module for shared configuration loading
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (claims, bearer extraction, validation)
pub mod jwt;
