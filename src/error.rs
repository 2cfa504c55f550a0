/// Failures talking to the remote prediction service. The predictor absorbs
/// all of these by falling back to the local scorer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("no remote prediction endpoint configured")]
    Unconfigured,

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed prediction response: {reason}")]
    Decode { reason: String },

    #[error("all {attempts} attempts failed: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl RemoteError {
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Transport { .. } => true,
            RemoteError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
