//! gatebot - Telegram bot gated behind a Flyer subscription check
//!
//! # Module Structure
//!
//! - `cli`: command-line interface
//! - `telegram`: bot construction, command enum and the dispatcher schema
//! - `webhook`: HTTP receiver for Flyer notifications

pub mod cli;
pub mod telegram;
pub mod webhook;

pub use telegram::{create_bot, schema, HandlerDeps};
pub use webhook::{create_webhook_router, start_webhook_server};
