use thiserror::Error;

use crate::check::CheckError;
use crate::core::config::ConfigError;
use crate::core::types::Tier;

/// Centralized error types for the application
///
/// Store, configuration and transport failures are converted to this enum so
/// handlers can log them at one boundary. Check-service failures normally do
/// not surface here: the gate turns them into `AccessDecision::Unavailable`.
///
/// # Example
///
/// ```no_run
/// use gatecore::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Startup configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Flyer check-service errors
    #[error("Check service error: {0}")]
    Check(#[from] CheckError),

    /// No check credential registered for a tier
    #[error("No check service configured for tier {0}")]
    TierNotConfigured(Tier),

    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
