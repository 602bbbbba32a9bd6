//! Access gate: asks the check service whether a user may proceed and
//! records the attempt in the profile store and the event log.

use std::sync::Arc;

use crate::check::CheckRouter;
use crate::core::config::AppConfig;
use crate::core::error::AppResult;
use crate::core::metrics;
use crate::core::types::{AccessDecision, BotUser, EventKind, UnavailablePolicy};
use crate::storage::{EventLog, NewEvent, ProfileStore, ProfileUpsert};

/// Orchestrates one access decision.
///
/// Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct AccessGate {
    profiles: Arc<dyn ProfileStore>,
    events: Arc<dyn EventLog>,
    checks: CheckRouter,
    default_language: String,
    policy: UnavailablePolicy,
}

impl AccessGate {
    pub fn new(profiles: Arc<dyn ProfileStore>, events: Arc<dyn EventLog>, checks: CheckRouter) -> Self {
        Self {
            profiles,
            events,
            checks,
            default_language: crate::core::config::defaults::LANGUAGE.to_string(),
            policy: UnavailablePolicy::default(),
        }
    }

    pub fn from_config(
        profiles: Arc<dyn ProfileStore>,
        events: Arc<dyn EventLog>,
        checks: CheckRouter,
        config: &AppConfig,
    ) -> Self {
        Self::new(profiles, events, checks)
            .with_default_language(config.default_language.clone())
            .with_policy(config.unavailable_policy)
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn with_policy(mut self, policy: UnavailablePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnavailablePolicy {
        self.policy
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    pub fn events(&self) -> &Arc<dyn EventLog> {
        &self.events
    }

    /// Appends a named event for `user`.
    pub async fn log_event(&self, user: &BotUser, event: EventKind, source: Option<&str>) -> AppResult<()> {
        self.events.record(&NewEvent::for_user(user, event, source)).await
    }

    /// Full evaluation: records a `check_access` event, runs the check for
    /// the user's tier, and merges the result into the profile.
    pub async fn evaluate_access(&self, user: &BotUser, source: Option<&str>) -> AppResult<AccessDecision> {
        self.log_event(user, EventKind::CheckAccess, source).await?;
        self.check_and_store(user, source).await
    }

    /// Same check and profile merge as [`evaluate_access`](Self::evaluate_access),
    /// without an event record and without a source.
    pub async fn evaluate_access_minimal(&self, user: &BotUser) -> AppResult<AccessDecision> {
        self.check_and_store(user, None).await
    }

    /// Applies the configured policy to a decision.
    pub fn allows(&self, decision: &AccessDecision) -> bool {
        decision.allows(self.policy)
    }

    async fn check_and_store(&self, user: &BotUser, source: Option<&str>) -> AppResult<AccessDecision> {
        let tier = user.tier();
        let service = self.checks.service_for(tier)?;
        let language = user.language_or(&self.default_language);

        let decision = match service.check(user.id, language).await {
            Ok(passed) => AccessDecision::from_passed(passed),
            Err(e) => {
                log::warn!("Flyer check unavailable for user {} ({} tier): {}", user.id, tier, e);
                AccessDecision::Unavailable { reason: e.to_string() }
            }
        };

        self.profiles
            .upsert(&ProfileUpsert::observed(user, source, decision.passed()))
            .await?;

        metrics::record_access_check(tier, &decision);
        log::info!("Access for user {} ({} tier): {}", user.id, tier, decision);

        Ok(decision)
    }
}
