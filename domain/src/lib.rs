//! Domain layer for innovation-casino
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Sessions and phases
//!
//! A facilitator drives a [`Session`] through its [`SessionPhase`] machine:
//!
//! ```text
//! waiting → betting_layer1 → results_layer1 → routing
//!         → betting_layer2 → results_layer2 → insights → closed
//! ```
//!
//! ## Chip allocations
//!
//! In each betting phase a participant spends exactly `chips_per_type` chips
//! of each type (time, talent, trust) across the legal options. A round-one
//! [`Allocation`] also routes the participant to the round-two group of the
//! option they backed most heavily.
//!
//! ## Results
//!
//! [`aggregate`] folds the immutable vote set into [`SessionResults`].

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod core;
pub mod results;
pub mod session;

// Re-export commonly used types
pub use allocation::{
    Allocation, AllocationError, AllocationRequest, ChipAllocation, ChipType, SubmittedChips,
    required_budget, routing_winner,
};
pub use catalog::{
    BoldnessTier, CatalogDefinition, CatalogError, CatalogOption, GroupDefinition,
    OptionCatalog, OptionDefinition, OptionSet, RoundOneOption, RoundTwoOption,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use crate::core::ids::{OptionId, ParticipantId, SessionId, VoteId};
pub use results::{
    DepartmentInsights, DepartmentStats, GroupResults, LayerResults, OptionResults,
    ResultsSummary, SessionResults, TierRollup, aggregate,
};
pub use session::{
    entities::{
        LayerDurations, Session, SessionMetadata, SessionSettings, SettingsError, SettingsOverride,
    },
    participant::Participant,
    phase::{SessionPhase, TransitionError},
    vote::{Vote, VotingRound},
};
