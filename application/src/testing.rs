//! Test doubles for the application ports

use crate::ports::event_publisher::{SessionEvent, SessionEventPublisher};
use crate::ports::session_store::{
    CommitOutcome, PhaseUpdate, Registration, SessionStore, StoreError,
};
use async_trait::async_trait;
use casino_domain::{
    OptionId, Participant, ParticipantId, Session, SessionId, SessionPhase, SessionResults, Vote,
    VotingRound,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionId, Session>,
    participants: Vec<Participant>,
    votes: Vec<Vote>,
    results: HashMap<SessionId, SessionResults>,
}

/// Single-mutex store fake with call counters
#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
    pub vote_reads: AtomicUsize,
    pub fail_vote_reads: Mutex<bool>,
    vote_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeStore {
    pub fn votes(&self) -> Vec<Vote> {
        self.inner.lock().unwrap().votes.clone()
    }

    pub fn session(&self, id: &SessionId) -> Session {
        self.inner.lock().unwrap().sessions[id].clone()
    }

    pub fn vote_reads(&self) -> usize {
        self.vote_reads.load(Ordering::SeqCst)
    }

    /// Park the next `list_votes` after it has read its snapshot
    ///
    /// The read returns once a permit is added to the returned gate.
    pub fn hold_next_vote_read(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.vote_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn set_phase(&self, id: &SessionId, phase: SessionPhase) {
        self.inner.lock().unwrap().sessions.get_mut(id).unwrap().phase = phase;
    }
}

#[async_trait]
impl SessionStore for FakeStore {
    async fn insert_session(&self, session: Session) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.lock().unwrap().sessions.get(id).cloned())
    }

    async fn update_phase(
        &self,
        id: &SessionId,
        expected: SessionPhase,
        next: SessionPhase,
    ) -> Result<PhaseUpdate, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionMissing(id.clone()))?;
        if session.phase != expected {
            return Ok(PhaseUpdate::Stale(session.phase));
        }
        session.phase = next;
        Ok(PhaseUpdate::Applied)
    }

    async fn update_option_text(
        &self,
        id: &SessionId,
        option: &OptionId,
        title: &str,
        description: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionMissing(id.clone()))?;
        Ok(session.catalog.update_text(option, title, description))
    }

    async fn register_participant(
        &self,
        participant: Participant,
    ) -> Result<Registration, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.participants.iter().find(|p| {
            p.session_id == participant.session_id && p.device_id == participant.device_id
        }) {
            return Ok(Registration::Existing(existing.clone()));
        }
        let session = inner
            .sessions
            .get_mut(&participant.session_id)
            .ok_or_else(|| StoreError::SessionMissing(participant.session_id.clone()))?;
        session.metadata.record_participant();
        inner.participants.push(participant.clone());
        Ok(Registration::Created(participant))
    }

    async fn get_participant(
        &self,
        session: &SessionId,
        participant: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .participants
            .iter()
            .find(|p| &p.session_id == session && &p.id == participant)
            .cloned())
    }

    async fn list_participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .participants
            .iter()
            .filter(|p| &p.session_id == session)
            .cloned()
            .collect())
    }

    async fn commit_vote(
        &self,
        vote: Vote,
        selection: Option<OptionId>,
    ) -> Result<CommitOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let participant = inner
            .participants
            .iter_mut()
            .find(|p| p.session_id == vote.session_id && p.id == vote.participant_id)
            .ok_or_else(|| StoreError::ParticipantMissing(vote.participant_id.clone()))?;
        if participant.has_completed(vote.round) {
            return Ok(CommitOutcome::AlreadySubmitted);
        }
        participant.mark_completed(vote.round, vote.submitted_at, selection);
        let session = inner
            .sessions
            .get_mut(&vote.session_id)
            .ok_or_else(|| StoreError::SessionMissing(vote.session_id.clone()))?;
        session.metadata.record_vote(vote.round);
        inner.votes.push(vote);
        Ok(CommitOutcome::Committed)
    }

    async fn list_votes(
        &self,
        session: &SessionId,
        round: Option<VotingRound>,
    ) -> Result<Vec<Vote>, StoreError> {
        self.vote_reads.fetch_add(1, Ordering::SeqCst);
        if *self.fail_vote_reads.lock().unwrap() {
            return Err(StoreError::Backend("votes unavailable".into()));
        }
        let votes: Vec<Vote> = self
            .inner
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|v| &v.session_id == session && round.is_none_or(|r| v.round == r))
            .cloned()
            .collect();

        let gate = self.vote_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        Ok(votes)
    }

    async fn put_results(&self, results: SessionResults) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .results
            .insert(results.session_id.clone(), results);
        Ok(())
    }

    async fn get_results(&self, session: &SessionId) -> Result<Option<SessionResults>, StoreError> {
        Ok(self.inner.lock().unwrap().results.get(session).cloned())
    }
}

/// Publisher that records every event
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<SessionEvent>>,
}

impl RecordingPublisher {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(SessionEvent::event_type)
            .collect()
    }
}

impl SessionEventPublisher for RecordingPublisher {
    fn publish(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
