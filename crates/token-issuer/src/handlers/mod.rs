pub mod health;
pub mod token_handler;

pub use health::{health_check, metrics_handler};
