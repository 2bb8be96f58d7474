//! Onboarding controller.
//!
//! Composes the selection store, step validator, local persistence and sync
//! coordinator. Every intent is applied in this order while the store lock
//! is held: mutate (normalizing ranks), validate, move the step cursor, write
//! through to the local slot. Remote sends are dispatched last and outlive
//! the call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fb_core::onboarding::{
    AffinityScore, OnboardingIntent, OnboardingState, OnboardingStep, SelectionStore,
    StepPayload, StepValidation, StepValidator,
};
use fb_core::ports::{AuthSessionPort, ClockPort, SportsCatalogPort};
use fb_core::SyncStatus;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use super::outcome::{IntentError, IntentOutcome, Transition};
use crate::deps::OnboardingDeps;
use crate::persistence::LocalPersistence;
use crate::sync::SyncCoordinator;

pub struct OnboardingController {
    store: Mutex<SelectionStore>,
    /// Latest committed snapshot, readable without waiting on the store lock.
    published: watch::Sender<OnboardingState>,
    persistence: LocalPersistence,
    sync: Arc<SyncCoordinator>,
    auth: Arc<dyn AuthSessionPort>,
    catalog: Arc<dyn SportsCatalogPort>,
    clock: Arc<dyn ClockPort>,
    navigating: AtomicBool,
    in_flight: Mutex<Vec<JoinHandle<SyncStatus>>>,
}

/// Clears the navigation flag when the in-flight navigation finishes.
struct NavigationGuard<'a>(&'a AtomicBool);

impl<'a> NavigationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for NavigationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl OnboardingController {
    /// Creates the controller, rehydrating the previous session from the
    /// local slot or starting fresh at the welcome step.
    pub async fn start(deps: OnboardingDeps) -> Self {
        let persistence = LocalPersistence::new(deps.slot);
        let mut store = match persistence.load().await {
            Some(state) => SelectionStore::from_state(state),
            None => {
                info!("starting a fresh onboarding session");
                SelectionStore::new()
            }
        };

        // A restored cursor may sit past a step that no longer holds, e.g.
        // after orphan teams were dropped or the catalog changed.
        let bookmarked = store.state().current_step;
        let landed = StepValidator::new(deps.catalog.as_ref()).resume_step(store.state());
        if landed != bookmarked {
            info!(
                bookmarked = bookmarked.number(),
                landed = landed.number(),
                "restored step has an unmet prerequisite, rewinding"
            );
            store.move_to(landed);
            if persistence.save(store.state()).await.is_err() {
                debug!("rewound step kept in memory only");
            }
        }

        let (published, _) = watch::channel(store.snapshot());
        Self {
            store: Mutex::new(store),
            published,
            persistence,
            sync: SyncCoordinator::new(deps.remote, Arc::clone(&deps.auth), deps.sync_policy),
            auth: deps.auth,
            catalog: deps.catalog,
            clock: deps.clock,
            navigating: AtomicBool::new(false),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> OnboardingState {
        self.published.borrow().clone()
    }

    /// Receives every committed snapshot, for re-rendering.
    pub fn subscribe_state(&self) -> watch::Receiver<OnboardingState> {
        self.published.subscribe()
    }

    /// Whether forward navigation out of `step` is currently permitted.
    pub fn validation(&self, step: OnboardingStep) -> StepValidation {
        self.validator().can_advance(step, &self.published.borrow())
    }

    pub async fn sync_status(&self, step: OnboardingStep) -> SyncStatus {
        self.sync.status(step).await
    }

    pub fn remote_available(&self) -> bool {
        self.sync.remote_available()
    }

    pub fn subscribe_remote_availability(&self) -> watch::Receiver<bool> {
        self.sync.subscribe()
    }

    pub fn persistence_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    pub async fn apply_intent(&self, intent: OnboardingIntent) -> Result<IntentOutcome, IntentError> {
        let span = info_span!("usecase.onboarding_controller.apply_intent", intent = intent.name());
        async move {
            let _navigation = if intent.is_navigation() {
                match NavigationGuard::acquire(&self.navigating) {
                    Some(guard) => Some(guard),
                    None => {
                        debug!("navigation already in flight, dropping intent");
                        return Ok(self.dropped_outcome());
                    }
                }
            } else {
                None
            };

            let mut store = self.store.lock().await;
            let completed = store.state().is_completed();
            if completed && !matches!(intent, OnboardingIntent::Complete) {
                return Err(IntentError::AlreadyCompleted);
            }

            let before = store.snapshot();
            let (transition, payloads) = self.mutate(&mut store, intent)?;
            let state = store.snapshot();

            let persistence = if state != before {
                self.persistence.save(&state).await.err()
            } else {
                None
            };
            self.published.send_replace(state.clone());

            match transition {
                Transition::Moved { from, to } => {
                    info!(from = from.number(), to = to.number(), "onboarding step changed")
                }
                Transition::Redirected { requested, landed } => info!(
                    requested = requested.number(),
                    landed = landed.number(),
                    "direct navigation redirected to unmet step"
                ),
                Transition::Blocked { reason } => debug!(%reason, "forward navigation blocked"),
                Transition::Completed => info!("onboarding completed"),
                Transition::Unchanged | Transition::Dropped => {}
            }

            self.dispatch_all(payloads).await;

            let validation = self.validator().can_advance(state.current_step, &state);
            Ok(IntentOutcome {
                state,
                validation,
                transition,
                persistence,
            })
        }
        .instrument(span)
        .await
    }

    /// Re-sends every step the user has already passed, plus the completion
    /// summary when onboarding is complete. Returns the steps a send was
    /// started for.
    pub async fn resync(&self) -> Vec<OnboardingStep> {
        let span = info_span!("usecase.onboarding_controller.resync");
        async {
            let state = self.state();
            let payloads: Vec<StepPayload> = OnboardingStep::ALL
                .into_iter()
                .filter(|step| *step < state.current_step || step.is_terminal())
                .filter_map(|step| StepPayload::for_completed_step(step, &state))
                .collect();

            let started = self.dispatch_all(payloads).await;
            info!(steps = started.len(), "manual resync dispatched");
            started
        }
        .instrument(span)
        .await
    }

    /// Starts onboarding over from the welcome step.
    ///
    /// Clears the slot through this controller's own persistence, so a
    /// session in memory-only mode tries local writes again afterwards.
    /// Sends already in flight are left to finish.
    pub async fn reset(&self) -> anyhow::Result<OnboardingState> {
        let span = info_span!("usecase.onboarding_controller.reset");
        async {
            let mut store = self.store.lock().await;
            self.persistence.clear().await?;
            *store = SelectionStore::new();
            let state = store.snapshot();
            self.published.send_replace(state.clone());
            info!("onboarding restarted from the welcome step");
            Ok(state)
        }
        .instrument(span)
        .await
    }

    /// Waits for every in-flight remote send and returns their outcomes.
    pub async fn settle_pending_sync(&self) -> Vec<SyncStatus> {
        let handles: Vec<_> = self.in_flight.lock().await.drain(..).collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(status) => outcomes.push(status),
                Err(err) => warn!(error = %err, "sync task did not finish"),
            }
        }
        outcomes
    }

    /// Ends the onboarding session: lets in-flight sends finish, then tears
    /// down the auth session.
    pub async fn shutdown(&self) {
        self.settle_pending_sync().await;
        self.auth.end_session();
        info!("onboarding session ended");
    }

    fn validator(&self) -> StepValidator<'_> {
        StepValidator::new(self.catalog.as_ref())
    }

    fn dropped_outcome(&self) -> IntentOutcome {
        let state = self.state();
        IntentOutcome {
            validation: self.validator().can_advance(state.current_step, &state),
            state,
            transition: Transition::Dropped,
            persistence: None,
        }
    }

    fn mutate(
        &self,
        store: &mut SelectionStore,
        intent: OnboardingIntent,
    ) -> Result<(Transition, Vec<StepPayload>), IntentError> {
        let validator = self.validator();
        let current = store.state().current_step;

        let outcome = match intent {
            OnboardingIntent::ToggleSport { sport_id } => {
                store.toggle_sport(&sport_id)?;
                (Transition::Unchanged, Vec::new())
            }
            OnboardingIntent::ReorderSport { sport_id, to_index } => {
                store.reorder_sport(&sport_id, to_index);
                (Transition::Unchanged, Vec::new())
            }
            OnboardingIntent::ToggleTeam {
                team_id,
                sport_id,
                default_affinity,
            } => {
                let affinity = default_affinity
                    .map(AffinityScore::clamped)
                    .unwrap_or_default();
                store.toggle_team(&team_id, &sport_id, affinity)?;
                (Transition::Unchanged, Vec::new())
            }
            OnboardingIntent::SetAffinity { team_id, score } => {
                store.set_team_affinity(&team_id, score);
                (Transition::Unchanged, Vec::new())
            }
            OnboardingIntent::SetPreferences { patch } => {
                store.set_preferences(patch);
                (Transition::Unchanged, Vec::new())
            }
            OnboardingIntent::Advance => match validator.can_advance(current, store.state()) {
                StepValidation::Blocked { reason } => (Transition::Blocked { reason }, Vec::new()),
                StepValidation::Allowed => match current.next() {
                    Some(to) => {
                        store.move_to(to);
                        let payloads = StepPayload::for_completed_step(current, store.state())
                            .into_iter()
                            .collect();
                        (Transition::Moved { from: current, to }, payloads)
                    }
                    None => (Transition::Unchanged, Vec::new()),
                },
            },
            OnboardingIntent::Back => match current.previous() {
                Some(to) => {
                    store.move_to(to);
                    (Transition::Moved { from: current, to }, Vec::new())
                }
                None => (Transition::Unchanged, Vec::new()),
            },
            OnboardingIntent::JumpToStep { step } => {
                let landed = validator.resolve_jump(step, store.state());
                if landed != current {
                    store.move_to(landed);
                }
                let transition = if landed != step {
                    Transition::Redirected {
                        requested: step,
                        landed,
                    }
                } else if landed != current {
                    Transition::Moved {
                        from: current,
                        to: landed,
                    }
                } else {
                    Transition::Unchanged
                };
                (transition, Vec::new())
            }
            OnboardingIntent::Complete => {
                if store.state().is_completed() {
                    return Ok((Transition::Unchanged, Vec::new()));
                }
                if let Some((step, reason)) =
                    validator.first_unmet_prerequisite(OnboardingStep::Completion, store.state())
                {
                    debug!(step = step.number(), "completion refused");
                    return Ok((Transition::Blocked { reason }, Vec::new()));
                }

                store.mark_completed(self.clock.now());
                // Steps skipped on the way to completion are sent as well.
                let mut payloads: Vec<StepPayload> = OnboardingStep::ALL
                    .into_iter()
                    .filter(|step| *step >= current && !step.is_terminal())
                    .filter_map(|step| StepPayload::for_completed_step(step, store.state()))
                    .collect();
                payloads.extend(StepPayload::for_completed_step(
                    OnboardingStep::Completion,
                    store.state(),
                ));
                (Transition::Completed, payloads)
            }
        };

        Ok(outcome)
    }

    async fn dispatch_all(&self, payloads: Vec<StepPayload>) -> Vec<OnboardingStep> {
        if payloads.is_empty() {
            return Vec::new();
        }

        let mut started = Vec::new();
        let mut in_flight = self.in_flight.lock().await;
        in_flight.retain(|handle| !handle.is_finished());
        for payload in payloads {
            let step = payload.step();
            if let Some(handle) = self.sync.dispatch(payload).await {
                in_flight.push(handle);
                started.push(step);
            }
        }
        started
    }
}

