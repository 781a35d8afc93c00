//! Transition Phase use case
//!
//! Moves a session one step along its phase machine. Entering a
//! result-bearing phase recomputes the results document eagerly; a failed
//! recomputation is logged and never blocks the transition.

use super::results::ResultsUseCase;
use crate::error::EngineError;
use crate::ports::session_store::{PhaseUpdate, SessionStore, StoreError};
use casino_domain::{SessionId, SessionPhase};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attempts before giving up on a phase that keeps changing underneath us
const MAX_ATTEMPTS: usize = 3;

/// Outcome of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: SessionPhase,
    pub to: SessionPhase,
    /// Whether results were recomputed successfully
    pub recomputed: bool,
}

impl PhaseChange {
    pub fn is_no_op(&self) -> bool {
        self.from == self.to
    }
}

/// Use case for facilitator-driven phase changes
pub struct TransitionPhaseUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
    results: Arc<ResultsUseCase<S>>,
}

impl<S: SessionStore + 'static> TransitionPhaseUseCase<S> {
    pub fn new(store: Arc<S>, results: Arc<ResultsUseCase<S>>) -> Self {
        Self { store, results }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        target: SessionPhase,
    ) -> Result<PhaseChange, EngineError> {
        for _ in 0..MAX_ATTEMPTS {
            let session = self
                .store
                .get_session(session_id)
                .await?
                .ok_or_else(|| EngineError::SessionNotFound(session_id.clone()))?;
            let from = session.phase;
            let to = from.transition(target)?;

            if from != to {
                match self.store.update_phase(session_id, from, to).await? {
                    PhaseUpdate::Applied => {
                        info!("Session {} phase {} -> {}", session_id, from, to);
                    }
                    PhaseUpdate::Stale(current) => {
                        debug!(
                            "Session {} moved to {} concurrently; re-validating",
                            session_id, current
                        );
                        continue;
                    }
                }
            }

            let recomputed = to.is_result_bearing() && self.recompute(session_id, to).await;
            return Ok(PhaseChange {
                from,
                to,
                recomputed,
            });
        }

        Err(EngineError::Storage(StoreError::Backend(format!(
            "session {} phase kept changing during transition",
            session_id
        ))))
    }

    async fn recompute(&self, session_id: &SessionId, phase: SessionPhase) -> bool {
        match self.results.recompute(session_id).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "Results recomputation on entering {} failed for session {}: {}",
                    phase, session_id, e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::FakeStore;
    use casino_domain::{OptionCatalog, Session, SessionSettings};
    use std::time::Duration;

    async fn setup() -> (Arc<FakeStore>, TransitionPhaseUseCase<FakeStore>, SessionId) {
        let store = Arc::new(FakeStore::default());
        let session = Session::new("fac", OptionCatalog::default_catalog(), SessionSettings::default());
        let id = session.id.clone();
        store.insert_session(session).await.unwrap();
        let results = Arc::new(ResultsUseCase::new(store.clone(), Duration::from_secs(2)));
        let use_case = TransitionPhaseUseCase::new(store.clone(), results);
        (store, use_case, id)
    }

    #[tokio::test]
    async fn test_walks_canonical_path() {
        let (store, use_case, id) = setup().await;
        let path = [
            SessionPhase::BettingLayer1,
            SessionPhase::ResultsLayer1,
            SessionPhase::Routing,
            SessionPhase::BettingLayer2,
            SessionPhase::ResultsLayer2,
            SessionPhase::Insights,
            SessionPhase::Closed,
        ];
        for phase in path {
            let change = use_case.execute(&id, phase).await.unwrap();
            assert_eq!(change.to, phase);
            assert_eq!(change.recomputed, phase.is_result_bearing());
        }
        assert_eq!(store.session(&id).phase, SessionPhase::Closed);
    }

    #[tokio::test]
    async fn test_illegal_transition_leaves_phase() {
        let (store, use_case, id) = setup().await;

        let err = use_case.execute(&id, SessionPhase::Insights).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalTransition);
        assert_eq!(store.session(&id).phase, SessionPhase::Waiting);
    }

    #[tokio::test]
    async fn test_same_phase_still_recomputes() {
        let (store, use_case, id) = setup().await;
        store.set_phase(&id, SessionPhase::ResultsLayer1);

        let change = use_case.execute(&id, SessionPhase::ResultsLayer1).await.unwrap();
        assert!(change.is_no_op());
        assert!(change.recomputed);
        assert_eq!(store.vote_reads(), 1);
    }

    #[tokio::test]
    async fn test_recompute_failure_does_not_block() {
        let (store, use_case, id) = setup().await;
        store.set_phase(&id, SessionPhase::BettingLayer1);
        *store.fail_vote_reads.lock().unwrap() = true;

        let change = use_case.execute(&id, SessionPhase::ResultsLayer1).await.unwrap();
        assert!(!change.recomputed);
        assert_eq!(store.session(&id).phase, SessionPhase::ResultsLayer1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let (_store, use_case, _id) = setup().await;
        let err = use_case
            .execute(&SessionId::new("missing"), SessionPhase::BettingLayer1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
