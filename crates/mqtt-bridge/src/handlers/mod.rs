pub mod health;
pub mod publish_handler;

pub use health::{health_check, metrics_handler};
