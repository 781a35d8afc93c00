//! In-memory session store
//!
//! Records are sharded per session: a read-mostly index maps each session id
//! to its own mutex-guarded [`SessionRecord`]. Writers in different sessions
//! never contend, and every multi-record update inside one session (vote +
//! completion flag + counters) happens under a single short critical
//! section. No guard is ever held across an `.await`.

use async_trait::async_trait;
use casino_application::ports::session_store::{
    CommitOutcome, PhaseUpdate, Registration, SessionStore, StoreError,
};
use casino_domain::{
    OptionId, Participant, ParticipantId, Session, SessionId, SessionPhase, SessionResults, Vote,
    VotingRound,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Everything stored for one session
#[derive(Debug)]
struct SessionRecord {
    session: Session,
    /// Registration order
    participants: Vec<Participant>,
    by_device: HashMap<String, usize>,
    votes: Vec<Vote>,
    results: Option<SessionResults>,
}

impl SessionRecord {
    fn new(session: Session) -> Self {
        Self {
            session,
            participants: Vec::new(),
            by_device: HashMap::new(),
            votes: Vec::new(),
            results: None,
        }
    }

    fn participant_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == id)
    }
}

/// Process-local [`SessionStore`] used by the simulator and tests
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionRecord>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    fn record(&self, id: &SessionId) -> Result<Arc<Mutex<SessionRecord>>, StoreError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| StoreError::Backend("session index poisoned".into()))?;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SessionMissing(id.clone()))
    }

    fn find_record(&self, id: &SessionId) -> Result<Option<Arc<Mutex<SessionRecord>>>, StoreError> {
        match self.record(id) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::SessionMissing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn lock(record: &Mutex<SessionRecord>) -> Result<MutexGuard<'_, SessionRecord>, StoreError> {
    record
        .lock()
        .map_err(|_| StoreError::Backend("session record poisoned".into()))
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert_session(&self, session: Session) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::Backend("session index poisoned".into()))?;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::Duplicate(session.id));
        }
        sessions.insert(
            session.id.clone(),
            Arc::new(Mutex::new(SessionRecord::new(session))),
        );
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let Some(record) = self.find_record(id)? else {
            return Ok(None);
        };
        let record = lock(&record)?;
        Ok(Some(record.session.clone()))
    }

    async fn update_phase(
        &self,
        id: &SessionId,
        expected: SessionPhase,
        next: SessionPhase,
    ) -> Result<PhaseUpdate, StoreError> {
        let record = self.record(id)?;
        let mut record = lock(&record)?;
        if record.session.phase != expected {
            return Ok(PhaseUpdate::Stale(record.session.phase));
        }
        record.session.phase = next;
        Ok(PhaseUpdate::Applied)
    }

    async fn update_option_text(
        &self,
        id: &SessionId,
        option: &OptionId,
        title: &str,
        description: &str,
    ) -> Result<bool, StoreError> {
        let record = self.record(id)?;
        let mut record = lock(&record)?;
        Ok(record.session.catalog.update_text(option, title, description))
    }

    async fn register_participant(
        &self,
        participant: Participant,
    ) -> Result<Registration, StoreError> {
        let record = self.record(&participant.session_id)?;
        let mut record = lock(&record)?;

        if let Some(&index) = record.by_device.get(&participant.device_id) {
            return Ok(Registration::Existing(record.participants[index].clone()));
        }

        let index = record.participants.len();
        record
            .by_device
            .insert(participant.device_id.clone(), index);
        record.participants.push(participant.clone());
        record.session.metadata.record_participant();
        Ok(Registration::Created(participant))
    }

    async fn get_participant(
        &self,
        session: &SessionId,
        participant: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError> {
        let Some(record) = self.find_record(session)? else {
            return Ok(None);
        };
        let record = lock(&record)?;
        Ok(record
            .participants
            .iter()
            .find(|p| &p.id == participant)
            .cloned())
    }

    async fn list_participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        let Some(record) = self.find_record(session)? else {
            return Ok(Vec::new());
        };
        let record = lock(&record)?;
        Ok(record.participants.clone())
    }

    async fn commit_vote(
        &self,
        vote: Vote,
        selection: Option<OptionId>,
    ) -> Result<CommitOutcome, StoreError> {
        let record = self.record(&vote.session_id)?;
        let mut record = lock(&record)?;

        let participant = record
            .participant_mut(&vote.participant_id)
            .ok_or_else(|| StoreError::ParticipantMissing(vote.participant_id.clone()))?;
        if participant.has_completed(vote.round) {
            return Ok(CommitOutcome::AlreadySubmitted);
        }
        participant.mark_completed(vote.round, vote.submitted_at, selection);

        record.session.metadata.record_vote(vote.round);
        record.votes.push(vote);
        Ok(CommitOutcome::Committed)
    }

    async fn list_votes(
        &self,
        session: &SessionId,
        round: Option<VotingRound>,
    ) -> Result<Vec<Vote>, StoreError> {
        let Some(record) = self.find_record(session)? else {
            return Ok(Vec::new());
        };
        let record = lock(&record)?;
        Ok(record
            .votes
            .iter()
            .filter(|v| round.is_none_or(|r| v.round == r))
            .cloned()
            .collect())
    }

    async fn put_results(&self, results: SessionResults) -> Result<(), StoreError> {
        let record = self.record(&results.session_id)?;
        let mut record = lock(&record)?;
        record.results = Some(results);
        Ok(())
    }

    async fn get_results(&self, session: &SessionId) -> Result<Option<SessionResults>, StoreError> {
        let Some(record) = self.find_record(session)? else {
            return Ok(None);
        };
        let record = lock(&record)?;
        Ok(record.results.clone())
    }
}
