//! Handler types and dependencies

use gatecore::core::BotUser;
use gatecore::AccessGate;
use teloxide::types::User;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub gate: AccessGate,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }
}

/// Converts a Telegram user into the identity the gate works with.
pub fn bot_user(user: &User) -> BotUser {
    BotUser {
        id: user.id.0 as i64,
        is_premium: user.is_premium,
        language_code: user.language_code.clone(),
    }
}
