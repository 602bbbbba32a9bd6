//! Logging initialization
//!
//! Code in this workspace logs through the `log` facade, as do teloxide and
//! sqlx. Records are forwarded into a `tracing` subscriber so the filter is
//! controlled by `RUST_LOG` (default `info`).

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialize the global logger.
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(String)` - A logger was already installed
pub fn init_logger() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to initialize logger: {}", e))?;
    tracing_log::LogTracer::init().map_err(|e| format!("Failed to install log bridge: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // Other tests in this binary may have installed a logger already,
        // so only the second call is asserted.
        let _ = init_logger();
        assert!(init_logger().is_err());
    }
}
