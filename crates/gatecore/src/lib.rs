//! gatecore - access gating for the gatebot Telegram bot
//!
//! This library holds everything that does not need a Telegram connection:
//! configuration, storage, the Flyer check client and the access gate.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, metrics and domain types
//! - `check`: Flyer subscription-check client and per-tier routing
//! - `storage`: PostgreSQL pool, profile store, event log and in-memory doubles
//! - `gate`: the access gate that ties the three together
//! - `testing`: scripted check service for tests

pub mod check;
pub mod core;
pub mod gate;
pub mod storage;
pub mod testing;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use check::{CheckRouter, CheckService, FlyerClient};
pub use gate::AccessGate;
pub use storage::{create_pool, DbPool, EventLog, ProfileStore};
