use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::RemoteError;
use crate::models::{ScoreResult, StudentProfile};
use crate::remote::{RemoteClient, RemoteConfig};
use crate::scorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub source: Source,
    #[serde(flatten)]
    pub result: ScoreResult,
}

/// Asks the remote model first and falls back to the local heuristic on
/// any failure.
#[derive(Debug)]
pub struct Predictor {
    remote: Option<RemoteClient>,
}

impl Predictor {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            remote: Some(RemoteClient::new(config)?),
        })
    }

    pub fn local_only() -> Self {
        Self { remote: None }
    }

    /// A client that cannot be built degrades to local-only scoring.
    pub fn from_config(config: Option<RemoteConfig>) -> Self {
        match config.map(Self::new) {
            Some(Ok(predictor)) => predictor,
            Some(Err(err)) => {
                warn!(error = %err, "remote prediction client unavailable, scoring locally");
                Self::local_only()
            }
            None => Self::local_only(),
        }
    }

    pub async fn predict(&self, profile: &StudentProfile) -> Outcome {
        match self.try_remote(profile).await {
            Ok(result) => {
                info!(probability = result.probability, "remote prediction received");
                Outcome {
                    source: Source::Remote,
                    result,
                }
            }
            Err(RemoteError::Unconfigured) => {
                debug!("no remote endpoint configured, scoring locally");
                Outcome {
                    source: Source::Local,
                    result: scorer::score(profile),
                }
            }
            Err(err) => {
                warn!(error = %err, "remote prediction unavailable, falling back to local heuristic");
                Outcome {
                    source: Source::Local,
                    result: scorer::score(profile),
                }
            }
        }
    }

    async fn try_remote(&self, profile: &StudentProfile) -> Result<ScoreResult, RemoteError> {
        let client = self.remote.as_ref().ok_or(RemoteError::Unconfigured)?;
        debug!(endpoint = %client.endpoint(), "requesting remote prediction");
        let prediction = client.predict(profile).await?;
        Ok(prediction.into_result())
    }
}
