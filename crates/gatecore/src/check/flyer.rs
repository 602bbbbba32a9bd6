//! Flyer API client.
//!
//! Calls `POST {base}/check` with the tier key. A `skip: true` verdict means
//! the user has completed the required subscriptions.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{CheckError, CheckService};

#[derive(Serialize)]
struct CheckRequest<'a> {
    key: &'a str,
    user_id: i64,
    language_code: &'a str,
}

#[derive(Deserialize)]
struct CheckResponse {
    skip: Option<bool>,
    error: Option<String>,
    warning: Option<String>,
}

/// One Flyer credential bound to an HTTP client.
pub struct FlyerClient {
    http: reqwest::Client,
    base_url: String,
    key: SecretString,
}

impl FlyerClient {
    pub fn new(base_url: impl Into<String>, key: SecretString, timeout: Duration) -> Result<Self, CheckError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, key))
    }

    /// Shares an existing connection pool between several keys.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key,
        }
    }
}

#[async_trait]
impl CheckService for FlyerClient {
    async fn check(&self, user_id: i64, language_code: &str) -> Result<bool, CheckError> {
        let body = CheckRequest {
            key: self.key.expose_secret(),
            user_id,
            language_code,
        };

        let response = self
            .http
            .post(format!("{}/check", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            log::debug!("Flyer check returned status {} for user {}", response.status(), user_id);
            return Err(CheckError::Status(response.status()));
        }

        let data: CheckResponse = response.json().await?;

        if let Some(warning) = data.warning.as_deref() {
            log::warn!("Flyer warning for user {}: {}", user_id, warning);
        }

        match (data.skip, data.error) {
            (Some(skip), error) => {
                if let Some(error) = error {
                    log::error!("Flyer error for user {}: {}", user_id, error);
                }
                Ok(skip)
            }
            (None, Some(error)) => Err(CheckError::Api(error)),
            (None, None) => Err(CheckError::Api("response carried no verdict".to_string())),
        }
    }
}
