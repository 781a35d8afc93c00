//! Vote records

use crate::allocation::Allocation;
use crate::core::ids::{OptionId, ParticipantId, SessionId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Voting round ("layer")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingRound {
    /// Round one: every participant votes over the round-one options
    Layer1,
    /// Round two: each participant votes within the group they were routed to
    Layer2,
}

impl VotingRound {
    pub fn as_str(&self) -> &'static str {
        match self {
            VotingRound::Layer1 => "layer1",
            VotingRound::Layer2 => "layer2",
        }
    }
}

impl fmt::Display for VotingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VotingRound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "layer1" | "1" => Ok(VotingRound::Layer1),
            "layer2" | "2" => Ok(VotingRound::Layer2),
            other => Err(format!("Unknown voting round: {}. Valid: layer1, layer2", other)),
        }
    }
}

/// One immutable allocation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub round: VotingRound,
    /// Round-two group the participant voted in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<OptionId>,
    pub allocations: Allocation,
    pub total_chips: u64,
    pub submitted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        session_id: SessionId,
        participant_id: ParticipantId,
        round: VotingRound,
        group_id: Option<OptionId>,
        allocations: Allocation,
    ) -> Self {
        let total_chips = allocations.total_chips();
        Self {
            id: VoteId::generate(),
            session_id,
            participant_id,
            round,
            group_id,
            allocations,
            total_chips,
            submitted_at: Utc::now(),
        }
    }

    /// Override the submission time (replays, fixtures)
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}
