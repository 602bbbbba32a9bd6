//! User profiles: one row per Telegram user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::db::DbPool;
use crate::core::error::AppResult;
use crate::core::types::BotUser;

/// Stored profile of a Telegram user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserProfile {
    #[sqlx(rename = "tg_id")]
    pub external_id: i64,
    pub is_premium: bool,
    /// First non-null acquisition tag ever seen
    pub source: Option<String>,
    /// Sticky: once true, ordinary upserts never reset it
    #[sqlx(rename = "flyer_passed")]
    pub passed_check: bool,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// One observation of a user, merged into their profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpsert {
    pub external_id: i64,
    pub is_premium: bool,
    pub source: Option<String>,
    pub passed_check: bool,
}

impl ProfileUpsert {
    pub fn observed(user: &BotUser, source: Option<&str>, passed_check: bool) -> Self {
        Self {
            external_id: user.id,
            is_premium: user.is_premium,
            source: source.map(str::to_string),
            passed_check,
        }
    }
}

/// Persistence for user profiles.
///
/// `upsert` merges per field: `is_premium` is overwritten, `source` keeps
/// the first non-null value, `passed_check` is OR-ed. Implementations must
/// make the merge atomic per identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn upsert(&self, profile: &ProfileUpsert) -> AppResult<()>;

    /// Sets `passed_check = true` directly, bypassing the merge.
    /// Returns the number of rows touched (0 for an unknown user).
    async fn mark_passed(&self, external_id: i64) -> AppResult<u64>;

    async fn get(&self, external_id: i64) -> AppResult<Option<UserProfile>>;

    async fn count(&self) -> AppResult<i64>;
}

/// PostgreSQL-backed profile store.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: DbPool,
}

impl PgProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn upsert(&self, profile: &ProfileUpsert) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (tg_id, is_premium, source, flyer_passed)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (tg_id) DO UPDATE
             SET is_premium = EXCLUDED.is_premium,
                 last_seen_at = NOW(),
                 flyer_passed = users.flyer_passed OR EXCLUDED.flyer_passed,
                 source = COALESCE(users.source, EXCLUDED.source)",
        )
        .bind(profile.external_id)
        .bind(profile.is_premium)
        .bind(profile.source.as_deref())
        .bind(profile.passed_check)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_passed(&self, external_id: i64) -> AppResult<u64> {
        let result = sqlx::query("UPDATE users SET flyer_passed = TRUE WHERE tg_id = $1")
            .bind(external_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn get(&self, external_id: i64) -> AppResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT tg_id, is_premium, source, flyer_passed, created_at, last_seen_at
             FROM users WHERE tg_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
