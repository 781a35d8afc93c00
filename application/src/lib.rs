//! Application layer for innovation-casino
//!
//! This crate contains use cases, port definitions, the results cache with
//! its rate limiters, and the [`VotingEngine`] facade tying them together.
//! It depends only on the domain layer.

pub mod config;
pub mod engine;
pub mod error;
pub mod ports;
pub mod rate_limit;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{CachePolicy, EngineConfig};
pub use engine::VotingEngine;
pub use error::{EngineError, ErrorKind};
pub use ports::{
    event_publisher::{CompositePublisher, NoEventPublisher, SessionEvent, SessionEventPublisher},
    random_source::{FixedRandom, RandomSource},
    session_store::{CommitOutcome, PhaseUpdate, Registration, SessionStore, StoreError},
};
pub use rate_limit::{Debouncer, ThrottleOutcome, Throttler, TtlCache};
pub use use_cases::create_session::{CreateSessionInput, CreateSessionUseCase};
pub use use_cases::register_participant::{RegisterParticipantInput, RegisterParticipantUseCase};
pub use use_cases::results::{ResultsQuery, ResultsUseCase, ResultsView};
pub use use_cases::submit_vote::{SubmitVoteInput, SubmitVoteOutput, SubmitVoteUseCase};
pub use use_cases::transition_phase::{PhaseChange, TransitionPhaseUseCase};
pub use use_cases::update_option_text::{UpdateOptionTextInput, UpdateOptionTextUseCase};
