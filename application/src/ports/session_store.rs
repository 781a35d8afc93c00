//! Session store port
//!
//! Defines the interface to the document store holding the four logical
//! collections of the engine: sessions, participants, votes and results.
//!
//! The store owns per-participant atomicity. [`SessionStore::commit_vote`]
//! must re-check the completion flag and apply the vote, the flag flip and
//! the counter increments as one unit, so two concurrent submissions for the
//! same (participant, round) can never both commit.

use async_trait::async_trait;
use casino_domain::{
    OptionId, Participant, ParticipantId, Session, SessionId, SessionPhase, SessionResults, Vote,
    VotingRound,
};
use thiserror::Error;

/// Errors surfaced by store implementations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionMissing(SessionId),

    #[error("Participant not found: {0}")]
    ParticipantMissing(ParticipantId),

    #[error("Session already exists: {0}")]
    Duplicate(SessionId),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Outcome of a compare-and-set phase update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseUpdate {
    Applied,
    /// The stored phase no longer matched the expected one
    Stale(SessionPhase),
}

/// Outcome of a participant registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new participant was inserted and the session counter incremented
    Created(Participant),
    /// The device was already registered in this session
    Existing(Participant),
}

impl Registration {
    pub fn participant(&self) -> &Participant {
        match self {
            Registration::Created(p) | Registration::Existing(p) => p,
        }
    }

    pub fn into_participant(self) -> Participant {
        match self {
            Registration::Created(p) | Registration::Existing(p) => p,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

/// Outcome of an atomic vote commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The completion flag was already set; nothing was written
    AlreadySubmitted,
}

/// Storage collaborator for sessions, participants, votes and results
///
/// Implementations must never hold a lock across an `.await`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a freshly created session
    async fn insert_session(&self, session: Session) -> Result<(), StoreError>;

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Move the session from `expected` to `next` if it is still in `expected`
    async fn update_phase(
        &self,
        id: &SessionId,
        expected: SessionPhase,
        next: SessionPhase,
    ) -> Result<PhaseUpdate, StoreError>;

    /// Rewrite one option's title and description
    ///
    /// Returns `false` when the catalog has no option with that id.
    async fn update_option_text(
        &self,
        id: &SessionId,
        option: &OptionId,
        title: &str,
        description: &str,
    ) -> Result<bool, StoreError>;

    /// Insert `participant` unless its device is already registered
    ///
    /// Insertion and the participant counter increment happen atomically.
    async fn register_participant(
        &self,
        participant: Participant,
    ) -> Result<Registration, StoreError>;

    async fn get_participant(
        &self,
        session: &SessionId,
        participant: &ParticipantId,
    ) -> Result<Option<Participant>, StoreError>;

    async fn list_participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError>;

    /// Atomically record `vote`
    ///
    /// Re-checks the participant's completion flag for the vote's round, then
    /// writes the vote, flips the flag, stamps the submission time, records
    /// `selection` (round one only) and increments the session counters.
    async fn commit_vote(
        &self,
        vote: Vote,
        selection: Option<OptionId>,
    ) -> Result<CommitOutcome, StoreError>;

    /// All votes of a session, optionally restricted to one round
    async fn list_votes(
        &self,
        session: &SessionId,
        round: Option<VotingRound>,
    ) -> Result<Vec<Vote>, StoreError>;

    /// Replace the session's results document wholesale
    async fn put_results(&self, results: SessionResults) -> Result<(), StoreError>;

    async fn get_results(&self, session: &SessionId) -> Result<Option<SessionResults>, StoreError>;
}
