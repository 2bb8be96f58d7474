//! Static auth session.
//!
//! Holds an identity token handed over by the embedding application (the CLI
//! reads it from the environment). Ending the session drops the token for good.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use fb_core::ports::{AuthError, AuthSessionPort};
use tracing::debug;

pub struct StaticAuthSession {
    token: RwLock<Option<String>>,
    ended: AtomicBool,
}

impl StaticAuthSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|token| !token.trim().is_empty())),
            ended: AtomicBool::new(false),
        }
    }

    pub fn signed_in(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }

    /// Replaces the token, e.g. after the provider refreshed it.
    pub fn set_token(&self, token: Option<String>) -> Result<(), AuthError> {
        if self.ended.load(Ordering::Acquire) {
            return Err(AuthError::SessionEnded);
        }
        let mut guard = self
            .token
            .write()
            .map_err(|_| AuthError::Provider("token lock poisoned".to_string()))?;
        *guard = token;
        Ok(())
    }
}

#[async_trait]
impl AuthSessionPort for StaticAuthSession {
    fn is_authenticated(&self) -> bool {
        !self.ended.load(Ordering::Acquire)
            && self
                .token
                .read()
                .map(|token| token.is_some())
                .unwrap_or(false)
    }

    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        if self.ended.load(Ordering::Acquire) {
            return Err(AuthError::SessionEnded);
        }
        self.token
            .read()
            .map(|token| token.clone())
            .map_err(|_| AuthError::Provider("token lock poisoned".to_string()))
    }

    fn end_session(&self) {
        self.ended.store(true, Ordering::Release);
        if let Ok(mut token) = self.token.write() {
            token.take();
        }
        debug!("auth session ended");
    }
}
