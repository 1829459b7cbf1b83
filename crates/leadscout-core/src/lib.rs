//! Shared domain types and configuration for leadscout.

mod app_config;
mod config;
mod events;
mod lead;
pub mod suggest;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use events::LogEvent;
pub use lead::Lead;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{min_var} ({min}) must not exceed {max_var} ({max})")]
    InvalidRange {
        min_var: String,
        min: u64,
        max_var: String,
        max: u64,
    },
}
