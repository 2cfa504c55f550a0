//! Client for the hosted prediction model (`POST /predict`).

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::models::{ScoreResult, StudentProfile, Suggestion};
use crate::scorer;

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(5),
            max_retries: 1,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Only `probability` (0-100) is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePrediction {
    pub probability: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl RemotePrediction {
    pub fn into_result(self) -> ScoreResult {
        let probability = self.probability.round().clamp(0.0, 100.0) as u32;
        scorer::assemble(probability, self.strengths, self.suggestions)
    }
}

#[derive(Debug)]
pub struct RemoteClient {
    config: RemoteConfig,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        if config.base_url.trim().is_empty() {
            return Err(RemoteError::Unconfigured);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self { config, http })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/predict", self.config.base_url.trim_end_matches('/'))
    }

    pub async fn predict(&self, profile: &StudentProfile) -> Result<RemotePrediction, RemoteError> {
        let url = self.endpoint();
        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(
                    attempt,
                    max_retries = self.config.max_retries,
                    ?backoff,
                    "retrying remote prediction"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.config.max_backoff);
            }

            match self.send_once(&url, profile).await {
                Ok(prediction) => return Ok(prediction),
                Err(err) if err.is_retryable() => {
                    warn!(attempt, error = %err, "remote prediction attempt failed");
                    last_err = err.to_string();
                }
                Err(err) => return Err(err),
            }
        }

        Err(RemoteError::RetriesExhausted {
            attempts: self.config.max_retries + 1,
            last: last_err,
        })
    }

    async fn send_once(
        &self,
        url: &str,
        profile: &StudentProfile,
    ) -> Result<RemotePrediction, RemoteError> {
        let response = self
            .http
            .post(url)
            .json(profile)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| RemoteError::Transport {
            reason: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            reason: e.to_string(),
        })
    }
}
