//! Engine errors
//!
//! Every failure an engine operation can produce is an [`EngineError`]. Callers
//! branch on [`EngineError::kind`], which is stable and serializable, rather
//! than on message text.

use crate::ports::session_store::StoreError;
use casino_domain::{
    AllocationError, CatalogError, OptionId, ParticipantId, SessionId, SessionPhase,
    SettingsError, TransitionError, VotingRound,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PhaseClosed,
    InvalidOption,
    InvalidAllocation,
    BudgetMismatch,
    AlreadySubmitted,
    NotRouted,
    IllegalTransition,
    InvalidRegistration,
    InvalidCatalog,
    InvalidSettings,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PhaseClosed => "phase_closed",
            ErrorKind::InvalidOption => "invalid_option",
            ErrorKind::InvalidAllocation => "invalid_allocation",
            ErrorKind::BudgetMismatch => "budget_mismatch",
            ErrorKind::AlreadySubmitted => "already_submitted",
            ErrorKind::NotRouted => "not_routed",
            ErrorKind::IllegalTransition => "illegal_transition",
            ErrorKind::InvalidRegistration => "invalid_registration",
            ErrorKind::InvalidCatalog => "invalid_catalog",
            ErrorKind::InvalidSettings => "invalid_settings",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Session is in {phase}; {round} votes are closed")]
    PhaseClosed {
        phase: SessionPhase,
        round: VotingRound,
    },

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Unknown option: {0}")]
    UnknownOption(OptionId),

    #[error("Participant {participant} already submitted {round}")]
    AlreadySubmitted {
        participant: ParticipantId,
        round: VotingRound,
    },

    #[error("Participant {participant} is not routed to group {}", .group.as_ref().map(|g| g.as_str()).unwrap_or("<none>"))]
    NotRouted {
        participant: ParticipantId,
        group: Option<OptionId>,
    },

    #[error("Unable to route participant {participant}: no round-one option received chips")]
    Unroutable { participant: ParticipantId },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::SessionNotFound(_) | EngineError::ParticipantNotFound(_) => {
                ErrorKind::NotFound
            }
            EngineError::PhaseClosed { .. } => ErrorKind::PhaseClosed,
            EngineError::Allocation(AllocationError::InvalidOption(_)) => ErrorKind::InvalidOption,
            EngineError::Allocation(AllocationError::InvalidAllocation { .. }) => {
                ErrorKind::InvalidAllocation
            }
            EngineError::Allocation(AllocationError::BudgetMismatch { .. }) => {
                ErrorKind::BudgetMismatch
            }
            EngineError::UnknownOption(_) => ErrorKind::InvalidOption,
            EngineError::AlreadySubmitted { .. } => ErrorKind::AlreadySubmitted,
            EngineError::NotRouted { .. } => ErrorKind::NotRouted,
            EngineError::Unroutable { .. } => ErrorKind::InvalidAllocation,
            EngineError::Transition(_) => ErrorKind::IllegalTransition,
            EngineError::InvalidRegistration(_) => ErrorKind::InvalidRegistration,
            EngineError::InvalidCatalog(_) => ErrorKind::InvalidCatalog,
            EngineError::InvalidSettings(_) => ErrorKind::InvalidSettings,
            EngineError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionMissing(id) => EngineError::SessionNotFound(id),
            StoreError::ParticipantMissing(id) => EngineError::ParticipantNotFound(id),
            other => EngineError::Storage(other),
        }
    }
}
