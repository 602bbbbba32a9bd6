//! Domain types shared by the gate, the stores and the bot handlers

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The user behind an incoming command, as far as the gate cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotUser {
    /// Telegram user id (the external identity)
    pub id: i64,
    pub is_premium: bool,
    /// Language reported by the Telegram client, if any
    pub language_code: Option<String>,
}

impl BotUser {
    pub fn new(id: i64, is_premium: bool) -> Self {
        Self {
            id,
            is_premium,
            language_code: None,
        }
    }

    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    pub fn tier(&self) -> Tier {
        Tier::of(self.is_premium)
    }

    /// Language for the check call, falling back to `default` when the
    /// client did not report one (or reported an empty string).
    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.language_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => default,
        }
    }
}

/// Check-service tier. Each tier has its own Flyer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Premium,
    Regular,
}

impl Tier {
    pub fn of(is_premium: bool) -> Self {
        if is_premium {
            Tier::Premium
        } else {
            Tier::Regular
        }
    }
}

/// Names written to the `traffic_log.event` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Start,
    Menu,
    CheckAccess,
}

/// Outcome of one access evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The check service says the user passed
    Granted,
    /// The check service says the user has not passed yet
    Denied,
    /// The check service could not be asked or gave no verdict
    Unavailable { reason: String },
}

impl AccessDecision {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied
        }
    }

    /// Whether this decision counts as a pass for the sticky profile flag.
    /// `Unavailable` never does, whatever the policy.
    pub fn passed(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn allows(&self, policy: UnavailablePolicy) -> bool {
        match self {
            AccessDecision::Granted => true,
            AccessDecision::Denied => false,
            AccessDecision::Unavailable { .. } => policy == UnavailablePolicy::FailOpen,
        }
    }

    /// Short label for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            AccessDecision::Granted => "granted",
            AccessDecision::Denied => "denied",
            AccessDecision::Unavailable { .. } => "unavailable",
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Unavailable { reason } => write!(f, "unavailable ({})", reason),
            other => f.write_str(other.outcome()),
        }
    }
}

/// What to do when the check service is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnavailablePolicy {
    /// Treat as denied: the user gets no reply
    #[default]
    FailClosed,
    /// Treat as granted: the user is let through
    FailOpen,
}
