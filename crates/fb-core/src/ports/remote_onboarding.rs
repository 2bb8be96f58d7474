//! Remote onboarding service port
//!
//! Accepts one payload per step. Only success or failure matters; response
//! bodies are never read.

use async_trait::async_trait;

use crate::onboarding::StepPayload;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote call timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote rejected credentials (status {status})")]
    Unauthorized { status: u16 },
    #[error("remote rejected payload (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("remote server error (status {status})")]
    Server { status: u16 },
}

impl RemoteError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Transport(_) | Self::Server { .. }
        )
    }
}

#[async_trait]
pub trait RemoteOnboardingPort: Send + Sync {
    async fn submit(&self, id_token: &str, payload: &StepPayload) -> Result<(), RemoteError>;
}
