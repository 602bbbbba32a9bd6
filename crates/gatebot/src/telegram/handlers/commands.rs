//! Command handler implementations (/start, /menu, menu button)
//!
//! Each handler returns the reply to send, or `None` when the user is not
//! let through. A denied user gets no message at all.

use gatecore::core::{metrics, BotUser, EventKind};
use gatecore::{AccessGate, AppResult};
use indoc::formatdoc;

/// Callback data of the inline "open menu" button
pub const MENU_CALLBACK: &str = "menu:open";

/// Placeholder shown by the menu
pub const MENU_TEXT: &str = "📍 Пример меню — функционал будет тут.";

/// A message to send back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Attach the inline "open menu" button
    pub menu_button: bool,
}

impl Reply {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu_button: false,
        }
    }
}

/// Extracts the acquisition source from `/start <token>`.
///
/// Only the first token after the command counts; a missing or empty
/// token gives `None`.
pub fn parse_start_source(text: &str) -> Option<String> {
    text.split_whitespace().nth(1).map(str::to_string)
}

pub fn welcome_text(is_premium: bool) -> String {
    formatdoc! {"
        👋 Добро пожаловать!

        Premium: {premium}
        Проверки пройдены.
        /menu - открыть меню",
        premium = if is_premium { "💎 Да" } else { "❌ Нет" },
    }
}

/// Handle /start
pub async fn on_start(gate: &AccessGate, user: &BotUser, text: &str) -> AppResult<Option<Reply>> {
    metrics::record_command("start");
    let source = parse_start_source(text);
    log::info!("/start from user {} (source: {:?})", user.id, source);

    gate.log_event(user, EventKind::Start, source.as_deref()).await?;

    let decision = gate.evaluate_access(user, source.as_deref()).await?;
    if !gate.allows(&decision) {
        return Ok(None);
    }

    Ok(Some(Reply {
        text: welcome_text(user.is_premium),
        menu_button: true,
    }))
}

/// Handle /menu
pub async fn on_menu(gate: &AccessGate, user: &BotUser) -> AppResult<Option<Reply>> {
    metrics::record_command("menu");

    gate.log_event(user, EventKind::Menu, None).await?;

    let decision = gate.evaluate_access(user, None).await?;
    if !gate.allows(&decision) {
        return Ok(None);
    }

    Ok(Some(Reply::plain(MENU_TEXT)))
}

/// Handle the inline "open menu" button
pub async fn on_menu_callback(gate: &AccessGate, user: &BotUser) -> AppResult<Option<Reply>> {
    metrics::record_command("menu_callback");

    let decision = gate.evaluate_access_minimal(user).await?;
    if !gate.allows(&decision) {
        return Ok(None);
    }

    Ok(Some(Reply::plain(MENU_TEXT)))
}
