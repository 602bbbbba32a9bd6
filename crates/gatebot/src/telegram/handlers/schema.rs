//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};

use super::commands::{on_menu, on_menu_callback, on_start, Reply, MENU_CALLBACK};
use super::types::{bot_user, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and can be used in integration tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (access gate)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(callback_handler(deps_callback))
}

fn menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "📍 Открыть меню",
        MENU_CALLBACK,
    )]])
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<(), HandlerError> {
    if reply.menu_button {
        bot.send_message(chat_id, reply.text).reply_markup(menu_keyboard()).await?;
    } else {
        bot.send_message(chat_id, reply.text).await?;
    }
    Ok(())
}

/// Handler for bot commands (/start, /menu)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let Some(from) = msg.from.as_ref() else {
                    log::debug!("Ignoring {:?} without sender in chat {}", cmd, msg.chat.id);
                    return Ok(());
                };
                let user = bot_user(from);
                log::info!("🎯 Received command: {:?} from user {}", cmd, user.id);

                let result = match cmd {
                    Command::Start(_) => on_start(&deps.gate, &user, msg.text().unwrap_or_default()).await,
                    Command::Menu => on_menu(&deps.gate, &user).await,
                };

                match result {
                    Ok(Some(reply)) => send_reply(&bot, msg.chat.id, reply).await?,
                    Ok(None) => log::info!("Access denied for user {}, no reply sent", user.id),
                    Err(e) => log::error!("❌ {:?} failed for user {}: {}", cmd, user.id, e),
                }
                Ok(())
            }
        },
    ))
}

/// Handler for the inline "open menu" button
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| q.data.as_deref() == Some(MENU_CALLBACK))
        .endpoint(move |bot: Bot, q: CallbackQuery| {
            let deps = deps.clone();
            async move {
                bot.answer_callback_query(q.id.clone()).await?;

                let user = bot_user(&q.from);
                let chat_id = q
                    .message
                    .as_ref()
                    .map(|m| m.chat().id)
                    .unwrap_or(ChatId(user.id));

                match on_menu_callback(&deps.gate, &user).await {
                    Ok(Some(reply)) => send_reply(&bot, chat_id, reply).await?,
                    Ok(None) => log::info!("Access denied for user {}, no reply sent", user.id),
                    Err(e) => log::error!("❌ menu callback failed for user {}: {}", user.id, e),
                }
                Ok(())
            }
        })
}
