pub mod authorize_handler;
pub mod health;

pub use health::{health_check, metrics_handler};
