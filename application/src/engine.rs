//! Voting engine facade
//!
//! Wires the use cases to one store, one publisher and one random source,
//! and owns the per-session rate limiters:
//!
//! ```text
//!                    ┌──────────────── VotingEngine ────────────────┐
//! submit_vote ──────▶│ SubmitVoteUseCase ──▶ publish VoteSubmitted  │
//!                    │        └──▶ Debouncer[session] ──┐           │
//! register ─────────▶│ RegisterParticipantUseCase ──────┤           │
//!                    │                                  ▼           │
//! request_refresh ──▶│ Throttler[session] ──▶ ResultsUseCase::recompute
//!                    │                                  └─▶ publish ResultsUpdated
//! get_results ──────▶│ ResultsUseCase::get (TtlCache read-through)  │
//! transition_phase ─▶│ TransitionPhaseUseCase ──▶ publish PhaseChanged
//!                    └──────────────────────────────────────────────┘
//! ```

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::ports::event_publisher::{SessionEvent, SessionEventPublisher};
use crate::ports::random_source::RandomSource;
use crate::ports::session_store::SessionStore;
use crate::rate_limit::{Debouncer, ThrottleOutcome, Throttler, lock};
use crate::use_cases::create_session::{CreateSessionInput, CreateSessionUseCase};
use crate::use_cases::register_participant::{
    RegisterParticipantInput, RegisterParticipantUseCase,
};
use crate::use_cases::results::{ResultsQuery, ResultsUseCase, ResultsView};
use crate::use_cases::submit_vote::{SubmitVoteInput, SubmitVoteOutput, SubmitVoteUseCase};
use crate::use_cases::transition_phase::{PhaseChange, TransitionPhaseUseCase};
use crate::use_cases::update_option_text::{UpdateOptionTextInput, UpdateOptionTextUseCase};
use casino_domain::{Participant, Session, SessionId, SessionPhase};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The engine's public surface
pub struct VotingEngine<S: SessionStore + 'static> {
    store: Arc<S>,
    publisher: Arc<dyn SessionEventPublisher>,
    config: EngineConfig,
    create_session: CreateSessionUseCase<S>,
    register_participant: RegisterParticipantUseCase<S>,
    submit_vote: SubmitVoteUseCase<S>,
    transition_phase: TransitionPhaseUseCase<S>,
    update_option_text: UpdateOptionTextUseCase<S>,
    results: Arc<ResultsUseCase<S>>,
    recompute: Mutex<HashMap<SessionId, Debouncer<()>>>,
    refresh: Mutex<HashMap<SessionId, Throttler<()>>>,
}

impl<S: SessionStore + 'static> VotingEngine<S> {
    pub fn new(
        store: Arc<S>,
        publisher: Arc<dyn SessionEventPublisher>,
        random: Arc<dyn RandomSource>,
        config: EngineConfig,
    ) -> Self {
        let results = Arc::new(ResultsUseCase::new(
            Arc::clone(&store),
            config.cache.results_ttl,
        ));
        Self {
            create_session: CreateSessionUseCase::new(
                Arc::clone(&store),
                config.session_defaults.clone(),
                config.catalog.clone(),
            ),
            register_participant: RegisterParticipantUseCase::new(Arc::clone(&store)),
            submit_vote: SubmitVoteUseCase::new(Arc::clone(&store), random),
            transition_phase: TransitionPhaseUseCase::new(
                Arc::clone(&store),
                Arc::clone(&results),
            ),
            update_option_text: UpdateOptionTextUseCase::new(Arc::clone(&store)),
            results,
            store,
            publisher,
            config,
            recompute: Mutex::new(HashMap::new()),
            refresh: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn create_session(&self, input: CreateSessionInput) -> Result<Session, EngineError> {
        self.create_session.execute(input).await
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<Session, EngineError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(session_id.clone()))
    }

    pub async fn transition_phase(
        &self,
        session_id: &SessionId,
        target: SessionPhase,
    ) -> Result<PhaseChange, EngineError> {
        let change = self.transition_phase.execute(session_id, target).await?;

        if !change.is_no_op() {
            self.publisher.publish(SessionEvent::PhaseChanged {
                session_id: session_id.clone(),
                from: change.from,
                to: change.to,
            });
        }
        if change.recomputed {
            self.publisher.publish(SessionEvent::ResultsUpdated {
                session_id: session_id.clone(),
            });
        }
        if change.to.is_terminal() {
            self.release(session_id).await;
        }
        Ok(change)
    }

    /// Register a participant; re-registration from the same device is a no-op
    pub async fn register_participant(
        &self,
        input: RegisterParticipantInput,
    ) -> Result<Participant, EngineError> {
        let registration = self.register_participant.execute(input).await?;
        if registration.is_new() {
            let participant = registration.participant();
            self.publisher.publish(SessionEvent::ParticipantJoined {
                session_id: participant.session_id.clone(),
                participant_id: participant.id.clone(),
            });
            self.schedule_recompute(&participant.session_id);
        }
        Ok(registration.into_participant())
    }

    pub async fn list_participants(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Participant>, EngineError> {
        self.get_session(session_id).await?;
        Ok(self.store.list_participants(session_id).await?)
    }

    pub async fn submit_vote(&self, input: SubmitVoteInput) -> Result<SubmitVoteOutput, EngineError> {
        let session_id = input.session_id.clone();
        let participant_id = input.participant_id.clone();
        let round = input.round;

        let output = self.submit_vote.execute(input).await?;
        self.publisher.publish(SessionEvent::VoteSubmitted {
            session_id: session_id.clone(),
            participant_id,
            round,
            vote_id: output.vote_id.clone(),
        });
        self.schedule_recompute(&session_id);
        Ok(output)
    }

    pub async fn get_results(
        &self,
        session_id: &SessionId,
        query: &ResultsQuery,
    ) -> Result<ResultsView, EngineError> {
        self.results.get(session_id, query).await
    }

    pub async fn update_option_text(&self, input: UpdateOptionTextInput) -> Result<(), EngineError> {
        let session_id = input.session_id.clone();
        self.update_option_text.execute(input).await?;
        self.schedule_recompute(&session_id);
        Ok(())
    }

    /// Ask for a background recomputation, at most one per throttle window
    pub fn request_refresh(&self, session_id: &SessionId) -> ThrottleOutcome {
        let throttler = {
            let mut refresh = lock(&self.refresh);
            refresh
                .entry(session_id.clone())
                .or_insert_with(|| {
                    Throttler::new(
                        self.config.cache.refresh_throttle,
                        self.recompute_action(session_id),
                    )
                })
                .clone()
        };
        let outcome = throttler.call(());
        if outcome == ThrottleOutcome::Queued {
            debug!("Refresh for session {} coalesced into pending call", session_id);
        }
        outcome
    }

    /// Run any pending write-triggered recomputation for the session now
    pub async fn flush_recompute(&self, session_id: &SessionId) -> bool {
        let debouncer = lock(&self.recompute).get(session_id).cloned();
        match debouncer {
            Some(debouncer) => debouncer.flush().await,
            None => false,
        }
    }

    fn schedule_recompute(&self, session_id: &SessionId) {
        let debouncer = {
            let mut recompute = lock(&self.recompute);
            recompute
                .entry(session_id.clone())
                .or_insert_with(|| {
                    Debouncer::new(
                        self.config.cache.recompute_debounce,
                        self.recompute_action(session_id),
                    )
                })
                .clone()
        };
        debouncer.schedule(());
    }

    fn recompute_action(
        &self,
        session_id: &SessionId,
    ) -> impl Fn(()) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        let results = Arc::clone(&self.results);
        let publisher = Arc::clone(&self.publisher);
        let session_id = session_id.clone();
        move |()| -> BoxFuture<'static, ()> {
            let results = Arc::clone(&results);
            let publisher = Arc::clone(&publisher);
            let session_id = session_id.clone();
            Box::pin(async move {
                match results.recompute(&session_id).await {
                    Ok(_) => publisher.publish(SessionEvent::ResultsUpdated { session_id }),
                    Err(e) => warn!(
                        "Background results recomputation failed for session {}: {}",
                        session_id, e
                    ),
                }
            })
        }
    }

    /// Drop the rate limiters and cached results of a closed session after
    /// running pending work
    async fn release(&self, session_id: &SessionId) {
        self.flush_recompute(session_id).await;
        lock(&self.recompute).remove(session_id);
        lock(&self.refresh).remove(session_id);
        self.results.evict(session_id);
    }
}
