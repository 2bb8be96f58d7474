//! Sync coordinator.
//!
//! Mirrors completed steps to the remote onboarding service. Sends are
//! fire-and-forget from the controller's point of view: they run on the tokio
//! runtime, are never cancelled by later intents and never touch local state.
//!
//! Per attempt: `Idle -> Sending -> {Succeeded | Failed}`. A failed attempt
//! clears `remote_available`; the next attempt optimistically sets it again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fb_core::onboarding::{OnboardingStep, StepPayload};
use fb_core::ports::{AuthSessionPort, RemoteError, RemoteOnboardingPort};
use fb_core::SyncStatus;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use super::SyncPolicy;

pub struct SyncCoordinator {
    remote: Arc<dyn RemoteOnboardingPort>,
    auth: Arc<dyn AuthSessionPort>,
    policy: SyncPolicy,
    /// Latest attempt per step, tagged with its sequence number.
    statuses: Mutex<HashMap<OnboardingStep, (u64, SyncStatus)>>,
    remote_available: watch::Sender<bool>,
    next_seq: AtomicU64,
    /// Highest sequence number that has settled; older completions arriving
    /// late must not overwrite the availability flag.
    settled_seq: AtomicU64,
}

impl SyncCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteOnboardingPort>,
        auth: Arc<dyn AuthSessionPort>,
        policy: SyncPolicy,
    ) -> Arc<Self> {
        let (remote_available, _) = watch::channel(true);
        Arc::new(Self {
            remote,
            auth,
            policy: SyncPolicy {
                max_attempts: policy.max_attempts.max(1),
                ..policy
            },
            statuses: Mutex::new(HashMap::new()),
            remote_available,
            next_seq: AtomicU64::new(0),
            settled_seq: AtomicU64::new(0),
        })
    }

    pub fn remote_available(&self) -> bool {
        *self.remote_available.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.remote_available.subscribe()
    }

    pub async fn status(&self, step: OnboardingStep) -> SyncStatus {
        self.statuses
            .lock()
            .await
            .get(&step)
            .map(|(_, status)| status.clone())
            .unwrap_or_default()
    }

    /// Starts a sync attempt for `payload`.
    ///
    /// Returns `None` without any network call when no authenticated session
    /// exists or no identity token can be obtained; the step's status is then
    /// `Idle` and `remote_available` is left as it was.
    pub async fn dispatch(self: &Arc<Self>, payload: StepPayload) -> Option<JoinHandle<SyncStatus>> {
        let step = payload.step();
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(token) = self.session_token().await else {
            self.record(step, seq, SyncStatus::Idle).await;
            return None;
        };

        self.record(step, seq, SyncStatus::Sending).await;
        self.remote_available.send_replace(true);

        let span = info_span!(
            "usecase.sync_coordinator.attempt",
            step = step.number(),
            kind = payload.kind(),
            seq
        );
        let this = Arc::clone(self);
        Some(tokio::spawn(
            async move { this.run_attempt(seq, token, payload).await }.instrument(span),
        ))
    }

    /// Token for the current session. A missing or failed token counts as
    /// "not authenticated".
    async fn session_token(&self) -> Option<String> {
        if !self.auth.is_authenticated() {
            debug!("not authenticated, skipping remote sync");
            return None;
        }

        match self.auth.id_token().await {
            Ok(Some(token)) => Some(token),
            Ok(None) => {
                debug!("no identity token, treating session as unauthenticated");
                None
            }
            Err(err) => {
                warn!(error = %err, "identity token fetch failed, skipping remote sync");
                None
            }
        }
    }

    async fn run_attempt(&self, seq: u64, token: String, payload: StepPayload) -> SyncStatus {
        let step = payload.step();
        let outcome = match self.submit_with_retry(&token, &payload).await {
            Ok(calls) => {
                info!(calls, "step synced");
                SyncStatus::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "step sync failed, remote marked unavailable");
                SyncStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };

        self.settle(step, seq, &outcome).await;
        outcome
    }

    /// Returns the number of calls made on success.
    async fn submit_with_retry(&self, token: &str, payload: &StepPayload) -> Result<u32, RemoteError> {
        let mut calls = 0;
        loop {
            calls += 1;
            let result =
                match tokio::time::timeout(self.policy.request_timeout, self.remote.submit(token, payload))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(RemoteError::Timeout),
                };

            match result {
                Ok(()) => return Ok(calls),
                Err(err) if err.is_transient() && calls < self.policy.max_attempts => {
                    let delay = self.policy.backoff_for(calls);
                    debug!(error = %err, calls, delay_ms = delay.as_millis() as u64, "retrying step sync");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn record(&self, step: OnboardingStep, seq: u64, status: SyncStatus) {
        let mut statuses = self.statuses.lock().await;
        match statuses.get(&step) {
            Some((current, _)) if *current > seq => {}
            _ => {
                statuses.insert(step, (seq, status));
            }
        }
    }

    async fn settle(&self, step: OnboardingStep, seq: u64, outcome: &SyncStatus) {
        self.record(step, seq, outcome.clone()).await;
        let previous = self.settled_seq.fetch_max(seq, Ordering::SeqCst);
        if previous < seq {
            self.remote_available
                .send_replace(matches!(outcome, SyncStatus::Succeeded));
        } else {
            debug!(seq, newest = previous, "stale attempt settled, availability unchanged");
        }
    }
}
