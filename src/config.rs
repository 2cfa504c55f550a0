use std::time::Duration;

use clap::Args;

use crate::remote::RemoteConfig;

#[derive(Debug, Clone, Args)]
pub struct RemoteArgs {
    /// Base URL of the hosted prediction API (local heuristic only when unset)
    #[arg(long, env = "PLACEMENT_API_URL")]
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, env = "PLACEMENT_API_TIMEOUT_SECS", default_value_t = 5)]
    pub timeout_secs: u64,
    /// Retries after the first failed attempt
    #[arg(long, env = "PLACEMENT_API_RETRIES", default_value_t = 1)]
    pub retries: u32,
    /// Skip the remote API and score locally
    #[arg(long)]
    pub offline: bool,
}

impl RemoteArgs {
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        if self.offline {
            return None;
        }
        let base_url = self.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty())?;

        Some(RemoteConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            max_retries: self.retries,
            ..RemoteConfig::default()
        })
    }
}
