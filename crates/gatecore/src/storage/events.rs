//! Append-only traffic log of named user events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::db::DbPool;
use crate::core::error::AppResult;
use crate::core::types::{BotUser, EventKind};

/// An event about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub external_id: i64,
    pub event: EventKind,
    pub source: Option<String>,
    /// Premium flag at the time of the event
    pub is_premium: bool,
}

impl NewEvent {
    pub fn for_user(user: &BotUser, event: EventKind, source: Option<&str>) -> Self {
        Self {
            external_id: user.id,
            event,
            source: source.map(str::to_string),
            is_premium: user.is_premium,
        }
    }
}

/// A stored event row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct EventRecord {
    pub id: i64,
    #[sqlx(rename = "tg_id")]
    pub external_id: i64,
    #[sqlx(rename = "event")]
    pub event_name: String,
    pub source: Option<String>,
    pub is_premium: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait EventLog: Send + Sync {
    async fn record(&self, event: &NewEvent) -> AppResult<()>;

    /// Events of one user, oldest first.
    async fn events_for(&self, external_id: i64) -> AppResult<Vec<EventRecord>>;
}

/// PostgreSQL-backed event log.
#[derive(Debug, Clone)]
pub struct PgEventLog {
    pool: DbPool,
}

impl PgEventLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PgEventLog {
    async fn record(&self, event: &NewEvent) -> AppResult<()> {
        sqlx::query("INSERT INTO traffic_log (tg_id, event, source, is_premium) VALUES ($1, $2, $3, $4)")
            .bind(event.external_id)
            .bind(event.event.as_ref())
            .bind(event.source.as_deref())
            .bind(event.is_premium)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn events_for(&self, external_id: i64) -> AppResult<Vec<EventRecord>> {
        let events = sqlx::query_as::<_, EventRecord>(
            "SELECT id, tg_id, event, source, is_premium, created_at
             FROM traffic_log WHERE tg_id = $1
             ORDER BY created_at, id",
        )
        .bind(external_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
