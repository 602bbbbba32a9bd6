use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

use super::{CheckService, FlyerClient};
use crate::core::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::core::types::Tier;

/// Tier → check service lookup table.
///
/// There is no fallback between tiers: a user whose tier has no entry gets
/// [`AppError::TierNotConfigured`].
#[derive(Clone, Default)]
pub struct CheckRouter {
    services: HashMap<Tier, Arc<dyn CheckService>>,
}

impl CheckRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, tier: Tier, service: Arc<dyn CheckService>) -> Self {
        self.services.insert(tier, service);
        self
    }

    /// Builds the premium and regular Flyer clients from configuration.
    /// Both share one HTTP connection pool.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder().timeout(config.flyer_timeout).build()?;
        let client = |key: &SecretString| -> Arc<dyn CheckService> {
            Arc::new(FlyerClient::with_client(http.clone(), config.flyer_api_url.clone(), key.clone()))
        };

        Ok(Self::new()
            .with_tier(Tier::Premium, client(&config.flyer_key_premium))
            .with_tier(Tier::Regular, client(&config.flyer_key_regular)))
    }

    pub fn service_for(&self, tier: Tier) -> AppResult<&Arc<dyn CheckService>> {
        self.services.get(&tier).ok_or(AppError::TierNotConfigured(tier))
    }
}
