//! Integration tests for the PostgreSQL stores.
//!
//! These need a live server: `DATABASE_URL=postgres://... cargo test -p gatecore -- --ignored`

#![allow(clippy::unwrap_used)]

use gatecore::core::{BotUser, EventKind};
use gatecore::storage::{EventLog, NewEvent, PgEventLog, PgProfileStore, ProfileStore, ProfileUpsert};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

fn observed(id: i64, source: Option<&str>, passed: bool) -> ProfileUpsert {
    ProfileUpsert::observed(&BotUser::new(id, false), source, passed)
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_upsert_creates_exactly_one_row(pool: PgPool) {
    let store = PgProfileStore::new(pool);

    store.upsert(&observed(42, None, false)).await.unwrap();
    store.upsert(&observed(42, None, false)).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_passed_flag_is_sticky(pool: PgPool) {
    let store = PgProfileStore::new(pool);

    store.upsert(&observed(42, None, true)).await.unwrap();
    store.upsert(&observed(42, None, false)).await.unwrap();

    assert!(store.get(42).await.unwrap().unwrap().passed_check);
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_source_keeps_first_non_null_value(pool: PgPool) {
    let store = PgProfileStore::new(pool);

    store.upsert(&observed(42, None, false)).await.unwrap();
    store.upsert(&observed(42, Some("a"), false)).await.unwrap();
    store.upsert(&observed(42, Some("b"), false)).await.unwrap();

    assert_eq!(store.get(42).await.unwrap().unwrap().source.as_deref(), Some("a"));
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_upsert_refreshes_last_seen_but_not_created_at(pool: PgPool) {
    let store = PgProfileStore::new(pool);

    store.upsert(&observed(42, None, false)).await.unwrap();
    let first = store.get(42).await.unwrap().unwrap();
    store
        .upsert(&ProfileUpsert::observed(&BotUser::new(42, true), None, false))
        .await
        .unwrap();
    let second = store.get(42).await.unwrap().unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.last_seen_at >= first.last_seen_at);
    assert!(second.is_premium);
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_mark_passed_overwrites_and_ignores_unknown_users(pool: PgPool) {
    let store = PgProfileStore::new(pool);
    store.upsert(&observed(42, None, false)).await.unwrap();

    assert_eq!(store.mark_passed(42).await.unwrap(), 1);
    assert_eq!(store.mark_passed(404).await.unwrap(), 0);

    assert!(store.get(42).await.unwrap().unwrap().passed_check);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_upserts_merge_commutatively(pool: PgPool) {
    let store = PgProfileStore::new(pool);

    let writes = [
        observed(7, None, false),
        observed(7, Some("promo"), true),
        observed(7, None, false),
        observed(7, None, false),
    ];
    let handles: Vec<_> = writes
        .into_iter()
        .map(|w| {
            let store = store.clone();
            tokio::spawn(async move { store.upsert(&w).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let profile = store.get(7).await.unwrap().unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
    assert!(profile.passed_check);
    assert_eq!(profile.source.as_deref(), Some("promo"));
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_event_log_round_trip_in_order(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let user = BotUser::new(42, true);

    log.record(&NewEvent::for_user(&user, EventKind::Start, Some("promo1")))
        .await
        .unwrap();
    log.record(&NewEvent::for_user(&user, EventKind::CheckAccess, Some("promo1")))
        .await
        .unwrap();

    let events = log.events_for(42).await.unwrap();
    let names: Vec<_> = events.iter().map(|e| e.event_name.as_str()).collect();
    assert_eq!(names, vec!["start", "check_access"]);
    assert_eq!(events[0].is_premium, Some(true));
    assert_eq!(events[0].source.as_deref(), Some("promo1"));
}

#[sqlx::test(migrator = "gatecore::storage::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_migrations_are_idempotent(pool: PgPool) {
    gatecore::storage::run_migrations(&pool).await.unwrap();
    gatecore::storage::run_migrations(&pool).await.unwrap();
}
