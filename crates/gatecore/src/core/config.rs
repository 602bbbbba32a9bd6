use std::env;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::core::types::UnavailablePolicy;

/// Startup configuration errors. Any of these aborts the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Default values for optional settings
pub mod defaults {
    /// Webhook listen port
    pub const PORT: u16 = 8000;

    /// Route that receives Flyer notifications
    pub const WEBHOOK_PATH: &str = "/flyer-webhook";

    /// Flyer API base URL
    pub const FLYER_API_URL: &str = "https://api.flyerservice.io";

    /// Timeout for a single Flyer check request (in seconds)
    pub const FLYER_TIMEOUT_SECS: u64 = 10;

    /// Language sent to Flyer when the Telegram client reports none
    pub const LANGUAGE: &str = "ru";

    /// Maximum number of pooled PostgreSQL connections
    pub const DATABASE_MAX_CONNECTIONS: u32 = 10;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Process configuration, read once at startup and passed down explicitly.
///
/// Secrets are kept as [`SecretString`] so they never end up in `Debug`
/// output or logs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token (BOT_TOKEN or TELOXIDE_TOKEN)
    pub bot_token: SecretString,
    /// Custom Bot API server (BOT_API_URL)
    pub bot_api_url: Option<String>,
    /// Flyer credential used for premium users (FLYER_KEY_PREMIUM)
    pub flyer_key_premium: SecretString,
    /// Flyer credential used for everyone else (FLYER_KEY_REGULAR)
    pub flyer_key_regular: SecretString,
    /// Flyer API base URL (FLYER_API_URL)
    pub flyer_api_url: String,
    /// Flyer request timeout (FLYER_TIMEOUT_SECS)
    pub flyer_timeout: Duration,
    /// PostgreSQL connection string (DATABASE_URL)
    pub database_url: SecretString,
    /// Pool size (DATABASE_MAX_CONNECTIONS)
    pub database_max_connections: u32,
    /// Webhook listen port (PORT)
    pub port: u16,
    /// Webhook route (WEBHOOK_PATH)
    pub webhook_path: String,
    /// Language sent to Flyer when the user has none (DEFAULT_LANGUAGE)
    pub default_language: String,
    /// How to treat an unreachable check service (CHECK_UNAVAILABLE_POLICY)
    pub unavailable_policy: UnavailablePolicy,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// Loads `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to load .env: {}", e);
            }
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let flyer_key_premium = require("FLYER_KEY_PREMIUM")?;
        let flyer_key_regular = require("FLYER_KEY_REGULAR")?;
        let database_url = require("DATABASE_URL")?;

        let port = parse_or("PORT", get("PORT"), defaults::PORT)?;
        let flyer_timeout_secs = parse_or("FLYER_TIMEOUT_SECS", get("FLYER_TIMEOUT_SECS"), defaults::FLYER_TIMEOUT_SECS)?;
        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            defaults::DATABASE_MAX_CONNECTIONS,
        )?;
        let unavailable_policy = parse_or(
            "CHECK_UNAVAILABLE_POLICY",
            get("CHECK_UNAVAILABLE_POLICY").map(|v| v.to_lowercase()),
            UnavailablePolicy::default(),
        )?;

        let webhook_path = get("WEBHOOK_PATH").unwrap_or_else(|| defaults::WEBHOOK_PATH.to_string());
        let webhook_path = if webhook_path.starts_with('/') {
            webhook_path
        } else {
            format!("/{}", webhook_path)
        };

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            bot_api_url: get("BOT_API_URL"),
            flyer_key_premium: SecretString::from(flyer_key_premium),
            flyer_key_regular: SecretString::from(flyer_key_regular),
            flyer_api_url: get("FLYER_API_URL")
                .unwrap_or_else(|| defaults::FLYER_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            flyer_timeout: Duration::from_secs(flyer_timeout_secs),
            database_url: SecretString::from(database_url),
            database_max_connections,
            port,
            webhook_path,
            default_language: get("DEFAULT_LANGUAGE").unwrap_or_else(|| defaults::LANGUAGE.to_string()),
            unavailable_policy,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
