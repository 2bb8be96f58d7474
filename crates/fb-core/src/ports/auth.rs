//! Auth session port
//!
//! An explicit session object injected into the sync path. Created when the
//! controller is constructed and ended when the onboarding session ends.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session has ended")]
    SessionEnded,
    #[error("token provider failed: {0}")]
    Provider(String),
}

#[async_trait]
pub trait AuthSessionPort: Send + Sync {
    /// Online/offline authenticated flag.
    fn is_authenticated(&self) -> bool;

    /// Fetch an identity token. `Ok(None)` and `Err(_)` both mean "skip sync".
    async fn id_token(&self) -> Result<Option<String>, AuthError>;

    /// Tear the session down; later token fetches must not succeed.
    fn end_session(&self);
}
