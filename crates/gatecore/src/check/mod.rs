//! Subscription check service
//!
//! The bot asks Flyer whether a user has completed the required
//! subscriptions. Each premium tier talks to Flyer with its own key, so
//! callers go through [`CheckRouter`] rather than a single client.

mod flyer;
mod router;

use async_trait::async_trait;
use thiserror::Error;

pub use flyer::FlyerClient;
pub use router::CheckRouter;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("check request failed with status: {0}")]
    Status(reqwest::StatusCode),
    #[error("check service returned an error: {0}")]
    Api(String),
}

/// A yes/no "has this user passed?" capability.
#[async_trait]
pub trait CheckService: Send + Sync {
    /// Returns `Ok(true)` when the user may proceed.
    async fn check(&self, user_id: i64, language_code: &str) -> Result<bool, CheckError>;
}
