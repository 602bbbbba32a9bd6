//! Telegram bot handler tree configuration
//!
//! The reply logic lives in `commands` as plain async functions over the
//! access gate; `schema` only wires them into teloxide and sends the result.

pub mod commands;
mod schema;
mod types;

pub use commands::{parse_start_source, Reply, MENU_CALLBACK};
pub use schema::schema;
pub use types::{bot_user, HandlerDeps, HandlerError};
