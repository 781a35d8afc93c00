//! Submit Vote use case
//!
//! Validates one participant's allocation for one round and commits it
//! atomically. Checks run in a fixed order so the error a client sees does
//! not depend on what else is wrong with the request:
//!
//! 1. session and participant exist
//! 2. the phase accepts the round
//! 3. the participant has not submitted this round yet
//! 4. round two only: the group matches the participant's routing
//! 5. the allocation is valid for the round's option set
//! 6. round one only: the routing winner is drawn; no winner is an error
//! 7. the store commits, re-checking the completion flag

use crate::error::EngineError;
use crate::ports::random_source::RandomSource;
use crate::ports::session_store::{CommitOutcome, SessionStore};
use casino_domain::{
    Allocation, AllocationRequest, OptionId, ParticipantId, SessionId, Vote, VoteId, VotingRound,
    routing_winner,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the SubmitVote use case
#[derive(Debug, Clone)]
pub struct SubmitVoteInput {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub round: VotingRound,
    pub allocations: AllocationRequest,
    /// Round-two group; defaults to the participant's routing, ignored in round one
    pub group_id: Option<OptionId>,
}

/// Output of a committed vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitVoteOutput {
    pub vote_id: VoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_winner: Option<OptionId>,
}

/// Use case for submitting an allocation
pub struct SubmitVoteUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
    random: Arc<dyn RandomSource>,
}

impl<S: SessionStore + 'static> SubmitVoteUseCase<S> {
    pub fn new(store: Arc<S>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    pub async fn execute(&self, input: SubmitVoteInput) -> Result<SubmitVoteOutput, EngineError> {
        let session = self
            .store
            .get_session(&input.session_id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(input.session_id.clone()))?;
        let participant = self
            .store
            .get_participant(&session.id, &input.participant_id)
            .await?
            .ok_or_else(|| EngineError::ParticipantNotFound(input.participant_id.clone()))?;

        let round = input.round;
        if !session.phase.accepts(round) {
            return Err(EngineError::PhaseClosed {
                phase: session.phase,
                round,
            });
        }

        if participant.has_completed(round) {
            return Err(EngineError::AlreadySubmitted {
                participant: participant.id,
                round,
            });
        }

        let group = match round {
            VotingRound::Layer1 => None,
            VotingRound::Layer2 => {
                let requested = input
                    .group_id
                    .or_else(|| participant.layer1_selection.clone());
                match (&requested, &participant.layer1_selection) {
                    (Some(group), Some(selection)) if group == selection => Some(group.clone()),
                    _ => {
                        return Err(EngineError::NotRouted {
                            participant: participant.id,
                            group: requested,
                        });
                    }
                }
            }
        };

        // A routing that no longer names a catalog group cannot be voted in
        let Some(legal) = session.catalog.legal_options(round, group.as_ref()) else {
            return Err(EngineError::NotRouted {
                participant: participant.id,
                group,
            });
        };
        let allocation =
            Allocation::validate(&input.allocations, &legal, session.settings.chips_per_type)?;

        // Every committed round-one vote must carry a routing
        let winner = match round {
            VotingRound::Layer1 => {
                let Some(winner) =
                    routing_winner(&allocation, &legal, || self.random.next_f64())
                else {
                    return Err(EngineError::Unroutable {
                        participant: participant.id,
                    });
                };
                Some(winner)
            }
            VotingRound::Layer2 => None,
        };

        let vote = Vote::new(
            session.id.clone(),
            participant.id.clone(),
            round,
            group,
            allocation,
        );
        let vote_id = vote.id.clone();

        match self.store.commit_vote(vote, winner.clone()).await? {
            CommitOutcome::Committed => {
                info!(
                    "Vote {} committed for participant {} in session {} ({})",
                    vote_id, participant.id, session.id, round
                );
                if let Some(winner) = &winner {
                    debug!("Participant {} routed to {}", participant.id, winner);
                }
                Ok(SubmitVoteOutput {
                    vote_id,
                    routing_winner: winner,
                })
            }
            CommitOutcome::AlreadySubmitted => Err(EngineError::AlreadySubmitted {
                participant: participant.id,
                round,
            }),
        }
    }
}
