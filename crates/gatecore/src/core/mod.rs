//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod types;

// Re-exports for convenience
pub use config::{AppConfig, ConfigError};
pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use types::{AccessDecision, BotUser, EventKind, Tier, UnavailablePolicy};
