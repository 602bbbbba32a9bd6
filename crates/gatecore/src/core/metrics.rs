//! Prometheus metrics for the access gate and the webhook
//!
//! Registered in the default registry; the webhook server exposes them at
//! `/metrics`.

#![allow(clippy::expect_used)]

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::core::types::{AccessDecision, Tier};

/// Access evaluations by tier and outcome
/// Labels: tier (premium/regular), outcome (granted/denied/unavailable)
pub static ACCESS_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gatebot_access_checks_total",
        "Total number of access evaluations by tier and outcome",
        &["tier", "outcome"]
    )
    .expect("register gatebot_access_checks_total")
});

/// Bot commands received
/// Labels: command (start/menu/menu_callback)
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("gatebot_commands_total", "Total number of handled bot commands", &["command"])
        .expect("register gatebot_commands_total")
});

/// Webhook notifications received
/// Labels: type (sub_completed/other/malformed)
pub static WEBHOOK_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gatebot_webhook_events_total",
        "Total number of Flyer webhook notifications by type",
        &["type"]
    )
    .expect("register gatebot_webhook_events_total")
});

pub fn record_access_check(tier: Tier, decision: &AccessDecision) {
    ACCESS_CHECKS_TOTAL
        .with_label_values(&[tier.as_ref(), decision.outcome()])
        .inc();
}

pub fn record_command(command: &str) {
    COMMANDS_TOTAL.with_label_values(&[command]).inc();
}

pub fn record_webhook_event(kind: &str) {
    WEBHOOK_EVENTS_TOTAL.with_label_values(&[kind]).inc();
}

/// Renders every registered metric in the Prometheus text format.
pub fn render() -> Result<(String, String), prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok((encoder.format_type().to_string(), String::from_utf8_lossy(&buffer).into_owned()))
}
