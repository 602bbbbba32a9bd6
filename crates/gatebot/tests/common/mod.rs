//! Shared helpers for gatebot integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gatecore::core::{BotUser, Tier};
use gatecore::storage::{EventLog, MemoryEventLog, MemoryProfileStore};
use gatecore::testing::ScriptedCheck;
use gatecore::{AccessGate, CheckRouter};

/// Sends a POST with a raw body and returns status plus the decoded JSON reply.
pub async fn post_raw(app: Router, path: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn post_json(app: Router, path: &str, payload: &Value) -> (StatusCode, Value) {
    post_raw(app, path, payload.to_string()).await
}

pub async fn get_text(app: Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// An access gate over in-memory stores with scripted check services.
pub struct TestGate {
    pub gate: AccessGate,
    pub profiles: Arc<MemoryProfileStore>,
    pub events: Arc<MemoryEventLog>,
    pub premium: Arc<ScriptedCheck>,
    pub regular: Arc<ScriptedCheck>,
}

impl TestGate {
    pub fn new(premium: ScriptedCheck, regular: ScriptedCheck) -> Self {
        let profiles = Arc::new(MemoryProfileStore::new());
        let events = Arc::new(MemoryEventLog::new());
        let premium = Arc::new(premium);
        let regular = Arc::new(regular);
        let router = CheckRouter::new()
            .with_tier(Tier::Premium, premium.clone())
            .with_tier(Tier::Regular, regular.clone());

        Self {
            gate: AccessGate::new(profiles.clone(), events.clone(), router),
            profiles,
            events,
            premium,
            regular,
        }
    }

    pub fn regular(check: ScriptedCheck) -> Self {
        Self::new(ScriptedCheck::always(true), check)
    }

    pub async fn event_names(&self, user_id: i64) -> Vec<String> {
        self.events
            .events_for(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_name)
            .collect()
    }
}

pub fn regular_user(id: i64) -> BotUser {
    BotUser::new(id, false).with_language("ru")
}

pub fn premium_user(id: i64) -> BotUser {
    BotUser::new(id, true).with_language("en")
}
