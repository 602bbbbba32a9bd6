//! PostgreSQL pool, profile store and event log

pub mod db;
pub mod events;
pub mod memory;
pub mod profiles;

// Re-exports for convenience
pub use db::{create_pool, run_migrations, DbPool, MIGRATOR};
pub use events::{EventLog, EventRecord, NewEvent, PgEventLog};
pub use memory::{MemoryEventLog, MemoryProfileStore};
pub use profiles::{PgProfileStore, ProfileStore, ProfileUpsert, UserProfile};
