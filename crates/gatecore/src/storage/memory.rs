//! In-process implementations of the stores.
//!
//! Same merge rules as the PostgreSQL versions. Used by tests and for
//! running handlers without a database.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::events::{EventLog, EventRecord, NewEvent};
use super::profiles::{ProfileStore, ProfileUpsert, UserProfile};
use crate::core::error::AppResult;

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<i64, UserProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn upsert(&self, profile: &ProfileUpsert) -> AppResult<()> {
        let now = Utc::now();
        // The entry guard holds the shard lock, so the merge is atomic per id.
        self.profiles
            .entry(profile.external_id)
            .and_modify(|existing| {
                existing.is_premium = profile.is_premium;
                existing.last_seen_at = now;
                existing.passed_check |= profile.passed_check;
                if existing.source.is_none() {
                    existing.source = profile.source.clone();
                }
            })
            .or_insert_with(|| UserProfile {
                external_id: profile.external_id,
                is_premium: profile.is_premium,
                source: profile.source.clone(),
                passed_check: profile.passed_check,
                created_at: now,
                last_seen_at: now,
            });
        Ok(())
    }

    async fn mark_passed(&self, external_id: i64) -> AppResult<u64> {
        match self.profiles.get_mut(&external_id) {
            Some(mut profile) => {
                profile.passed_check = true;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn get(&self, external_id: i64) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(&external_id).map(|p| p.value().clone()))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.profiles.len() as i64)
    }
}

#[derive(Debug, Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<EventRecord>>,
    next_id: AtomicI64,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn record(&self, event: &NewEvent) -> AppResult<()> {
        let record = EventRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            external_id: event.external_id,
            event_name: event.event.as_ref().to_string(),
            source: event.source.clone(),
            is_premium: Some(event.is_premium),
            created_at: Utc::now(),
        };
        self.events.lock().unwrap_or_else(|p| p.into_inner()).push(record);
        Ok(())
    }

    async fn events_for(&self, external_id: i64) -> AppResult<Vec<EventRecord>> {
        let events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        Ok(events.iter().filter(|e| e.external_id == external_id).cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::types::{BotUser, EventKind};
    use pretty_assertions::assert_eq;

    fn upsert(id: i64, source: Option<&str>, passed: bool) -> ProfileUpsert {
        ProfileUpsert::observed(&BotUser::new(id, false), source, passed)
    }

    #[tokio::test]
    async fn test_passed_flag_is_sticky() {
        let store = MemoryProfileStore::new();
        store.upsert(&upsert(7, None, true)).await.unwrap();
        store.upsert(&upsert(7, None, false)).await.unwrap();

        assert!(store.get(7).await.unwrap().unwrap().passed_check);
    }

    #[tokio::test]
    async fn test_first_source_wins() {
        let store = MemoryProfileStore::new();
        store.upsert(&upsert(7, None, false)).await.unwrap();
        store.upsert(&upsert(7, Some("a"), false)).await.unwrap();
        store.upsert(&upsert(7, Some("b"), false)).await.unwrap();

        assert_eq!(store.get(7).await.unwrap().unwrap().source.as_deref(), Some("a"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_premium_flag_follows_latest_observation() {
        let store = MemoryProfileStore::new();
        store
            .upsert(&ProfileUpsert::observed(&BotUser::new(7, true), None, false))
            .await
            .unwrap();
        store.upsert(&upsert(7, None, false)).await.unwrap();

        assert!(!store.get(7).await.unwrap().unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_mark_passed_unknown_user_touches_nothing() {
        let store = MemoryProfileStore::new();
        assert_eq!(store.mark_passed(99).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_event_log_keeps_insertion_order_per_user() {
        let log = MemoryEventLog::new();
        let user = BotUser::new(5, true);
        log.record(&NewEvent::for_user(&user, EventKind::Start, Some("promo")))
            .await
            .unwrap();
        log.record(&NewEvent::for_user(&BotUser::new(6, false), EventKind::Menu, None))
            .await
            .unwrap();
        log.record(&NewEvent::for_user(&user, EventKind::CheckAccess, Some("promo")))
            .await
            .unwrap();

        let names: Vec<_> = log
            .events_for(5)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_name)
            .collect();
        assert_eq!(names, vec!["start", "check_access"]);
    }
}
