//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use gatecore::core::config::{self, AppConfig};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    /// Payload is the deep-link token, possibly empty
    #[command(description = "начать работу с ботом")]
    Start(String),
    #[command(description = "открыть меню")]
    Menu,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to create bot (invalid URL, client build error)
pub fn create_bot(config: &AppConfig) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config.bot_token.expose_secret(), client);

    let bot = if let Some(bot_api_url) = config.bot_api_url.as_deref() {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        bot.set_api_url(url)
    } else {
        bot
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "начать работу с ботом"),
        BotCommand::new("menu", "открыть меню"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_descriptions() {
        let command_list = format!("{}", Command::descriptions());

        assert!(command_list.contains("Я умею"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("menu"));
    }

    #[test]
    fn test_start_payload_is_parsed() {
        assert_eq!(
            Command::parse("/start promo1", "gate_bot").unwrap(),
            Command::Start("promo1".to_string())
        );
        assert_eq!(Command::parse("/start", "gate_bot").unwrap(), Command::Start(String::new()));
        assert_eq!(Command::parse("/menu", "gate_bot").unwrap(), Command::Menu);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Command::parse("/settings", "gate_bot").is_err());
    }
}
