//! Test doubles for the check service
//!
//! ```rust
//! # async fn demo() {
//! use gatecore::testing::ScriptedCheck;
//! use gatecore::CheckService;
//!
//! let check = ScriptedCheck::always(true);
//! assert!(check.check(42, "ru").await.unwrap());
//! assert_eq!(check.calls(), vec![(42, "ru".to_string())]);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::check::{CheckError, CheckService};

/// A scripted answer from the fake check service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    Pass,
    Deny,
    /// Fails the call as if the service returned HTTP 503
    Unavailable,
}

/// Check service that replays scripted answers and records every call.
///
/// Once the script runs out, the last answer repeats.
#[derive(Debug)]
pub struct ScriptedCheck {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Scripted>,
    calls: Mutex<Vec<(i64, String)>>,
}

impl ScriptedCheck {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(Scripted::Unavailable),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(passed: bool) -> Self {
        Self::new([if passed { Scripted::Pass } else { Scripted::Deny }])
    }

    /// `(user_id, language_code)` of every call so far.
    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn next(&self) -> Scripted {
        let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(answer) = self.script.lock().unwrap_or_else(|p| p.into_inner()).pop_front() {
            *last = answer;
        }
        *last
    }
}

#[async_trait]
impl CheckService for ScriptedCheck {
    async fn check(&self, user_id: i64, language_code: &str) -> Result<bool, CheckError> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((user_id, language_code.to_string()));

        match self.next() {
            Scripted::Pass => Ok(true),
            Scripted::Deny => Ok(false),
            Scripted::Unavailable => Err(CheckError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
        }
    }
}
