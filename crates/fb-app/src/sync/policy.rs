use std::time::Duration;

use fb_core::config::RemoteConfig;

/// Retry and timeout policy for one sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Calls per attempt, including the first one. Always at least 1.
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// Bound on a single remote call.
    pub request_timeout: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl SyncPolicy {
    /// Applies defaults to the raw config DTO. Zero means "not configured".
    pub fn from_config(remote: &RemoteConfig) -> Self {
        let defaults = Self::default();
        let or_default = |millis: u64, fallback: Duration| {
            if millis == 0 {
                fallback
            } else {
                Duration::from_millis(millis)
            }
        };

        let base_backoff = or_default(remote.base_backoff_ms, defaults.base_backoff);
        Self {
            max_attempts: if remote.max_attempts == 0 {
                defaults.max_attempts
            } else {
                remote.max_attempts
            },
            base_backoff,
            max_backoff: or_default(remote.max_backoff_ms, defaults.max_backoff).max(base_backoff),
            request_timeout: or_default(remote.request_timeout_ms, defaults.request_timeout),
        }
    }

    /// Delay before the next call after `failed_calls` failures (1-based):
    /// `base * 2^(failed_calls - 1)`, capped at `max_backoff`.
    pub fn backoff_for(&self, failed_calls: u32) -> Duration {
        let exponent = failed_calls.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}
