#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fb_app::{OnboardingController, OnboardingDeps, SyncPolicy};
use fb_core::onboarding::StepPayload;
use fb_core::ports::{
    AuthSessionPort, ClockPort, RemoteError, RemoteOnboardingPort, StorageSlotPort,
};
use fb_infra::{InMemoryStorageSlot, StaticAuthSession, StaticSportsCatalog};

pub const SLOT_KEY: &str = "fanboard.onboarding";

pub struct FixedClock(pub DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Remote that records every payload and answers from a script, then `Ok`.
#[derive(Default)]
pub struct RecordingRemote {
    received: Mutex<Vec<StepPayload>>,
    script: Mutex<Vec<Result<(), RemoteError>>>,
    calls: AtomicUsize,
}

impl RecordingRemote {
    pub fn failing_with(errors: Vec<RemoteError>) -> Self {
        Self {
            script: Mutex::new(errors.into_iter().map(Err).rev().collect()),
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_with(vec![RemoteError::Server { status: 503 }; 64])
    }

    pub fn received(&self) -> Vec<StepPayload> {
        let mut payloads = self.received.lock().unwrap().clone();
        payloads.sort_by_key(StepPayload::step);
        payloads
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteOnboardingPort for RecordingRemote {
    async fn submit(&self, _id_token: &str, payload: &StepPayload) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.script.lock().unwrap().pop().unwrap_or(Ok(()));
        if outcome.is_ok() {
            self.received.lock().unwrap().push(payload.clone());
        }
        outcome
    }
}

pub struct Harness {
    pub slot: Arc<dyn StorageSlotPort>,
    pub remote: Arc<RecordingRemote>,
    pub auth: Arc<StaticAuthSession>,
    pub policy: SyncPolicy,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(InMemoryStorageSlot::new(SLOT_KEY)),
            remote: Arc::new(RecordingRemote::default()),
            auth: Arc::new(StaticAuthSession::signed_in("token-123")),
            policy: quick_policy(),
        }
    }

    pub fn with_slot(mut self, slot: Arc<dyn StorageSlotPort>) -> Self {
        self.slot = slot;
        self
    }

    pub fn with_remote(mut self, remote: RecordingRemote) -> Self {
        self.remote = Arc::new(remote);
        self
    }

    pub fn signed_out(mut self) -> Self {
        self.auth = Arc::new(StaticAuthSession::signed_out());
        self
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn deps(&self) -> OnboardingDeps {
        OnboardingDeps {
            slot: Arc::clone(&self.slot),
            remote: self.remote.clone(),
            auth: self.auth.clone() as Arc<dyn AuthSessionPort>,
            sync_policy: self.policy,
            catalog: Arc::new(StaticSportsCatalog::new(["nfl", "nba", "nhl"])),
            clock: Arc::new(FixedClock(fixed_instant())),
        }
    }

    pub async fn start(&self) -> OnboardingController {
        OnboardingController::start(self.deps()).await
    }
}

pub fn quick_policy() -> SyncPolicy {
    SyncPolicy {
        max_attempts: 1,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
        request_timeout: Duration::from_secs(5),
    }
}
