//! Session phase state machine
//!
//! ```text
//! waiting → betting_layer1 → results_layer1 → routing
//!         → betting_layer2 → results_layer2 → insights → closed
//!
//! legacy:  betting → results → closed
//! ```
//!
//! Transitions are single-step along the path above; any phase that is not
//! `closed` may also jump straight to `closed` when a facilitator ends the
//! session early.

use super::vote::VotingRound;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the phase state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot move session from {from} to {to} (allowed: {allowed})")]
    IllegalTransition {
        from: SessionPhase,
        to: SessionPhase,
        allowed: String,
    },
}

/// Phase of a voting session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Waiting,
    BettingLayer1,
    ResultsLayer1,
    Routing,
    BettingLayer2,
    ResultsLayer2,
    Insights,
    Closed,
    /// Single-round sessions created before two-layer voting
    Betting,
    /// Results of a single-round session
    Results,
}

impl SessionPhase {
    /// Phases reachable in one step from this one
    pub fn allowed_transitions(&self) -> &'static [SessionPhase] {
        use SessionPhase::*;
        match self {
            Waiting => &[BettingLayer1, Closed],
            BettingLayer1 => &[ResultsLayer1, Closed],
            ResultsLayer1 => &[Routing, Closed],
            Routing => &[BettingLayer2, Closed],
            BettingLayer2 => &[ResultsLayer2, Closed],
            ResultsLayer2 => &[Insights, Closed],
            Insights => &[Closed],
            Betting => &[Results, Closed],
            Results => &[Closed],
            Closed => &[],
        }
    }

    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Check a transition against the table
    ///
    /// Re-entering the current phase is accepted as a no-op.
    pub fn transition(&self, target: SessionPhase) -> Result<SessionPhase, TransitionError> {
        if target == *self || self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError::IllegalTransition {
                from: *self,
                to: target,
                allowed: self
                    .allowed_transitions()
                    .iter()
                    .map(SessionPhase::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }

    /// Entering this phase refreshes the results document
    pub fn is_result_bearing(&self) -> bool {
        matches!(
            self,
            SessionPhase::ResultsLayer1
                | SessionPhase::ResultsLayer2
                | SessionPhase::Insights
                | SessionPhase::Results
        )
    }

    /// Whether votes for `round` are accepted in this phase
    pub fn accepts(&self, round: VotingRound) -> bool {
        match round {
            VotingRound::Layer1 => {
                matches!(self, SessionPhase::BettingLayer1 | SessionPhase::Betting)
            }
            VotingRound::Layer2 => matches!(self, SessionPhase::BettingLayer2),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, SessionPhase::Betting | SessionPhase::Results)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Waiting => "waiting",
            SessionPhase::BettingLayer1 => "betting_layer1",
            SessionPhase::ResultsLayer1 => "results_layer1",
            SessionPhase::Routing => "routing",
            SessionPhase::BettingLayer2 => "betting_layer2",
            SessionPhase::ResultsLayer2 => "results_layer2",
            SessionPhase::Insights => "insights",
            SessionPhase::Closed => "closed",
            SessionPhase::Betting => "betting",
            SessionPhase::Results => "results",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SessionPhase::Waiting => "Waiting to Start",
            SessionPhase::BettingLayer1 => "Layer 1 Voting",
            SessionPhase::ResultsLayer1 => "Layer 1 Results",
            SessionPhase::Routing => "Routing Participants",
            SessionPhase::BettingLayer2 => "Layer 2 Voting",
            SessionPhase::ResultsLayer2 => "Layer 2 Results",
            SessionPhase::Insights => "Insights & Debrief",
            SessionPhase::Closed => "Session Closed",
            SessionPhase::Betting => "Betting Live",
            SessionPhase::Results => "Final Results",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use SessionPhase::*;
        let phase = match s.trim().to_lowercase().as_str() {
            "waiting" => Waiting,
            "betting_layer1" => BettingLayer1,
            "results_layer1" => ResultsLayer1,
            "routing" => Routing,
            "betting_layer2" => BettingLayer2,
            "results_layer2" => ResultsLayer2,
            "insights" => Insights,
            "closed" => Closed,
            "betting" => Betting,
            "results" => Results,
            other => return Err(format!("Unknown session phase: {}", other)),
        };
        Ok(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [SessionPhase; 8] = [
        SessionPhase::Waiting,
        SessionPhase::BettingLayer1,
        SessionPhase::ResultsLayer1,
        SessionPhase::Routing,
        SessionPhase::BettingLayer2,
        SessionPhase::ResultsLayer2,
        SessionPhase::Insights,
        SessionPhase::Closed,
    ];

    #[test]
    fn test_canonical_path_is_single_step() {
        for pair in CANONICAL.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_skipping_is_rejected() {
        let err = SessionPhase::Waiting
            .transition(SessionPhase::ResultsLayer1)
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionError::IllegalTransition {
                from: SessionPhase::Waiting,
                to: SessionPhase::ResultsLayer1,
                ..
            }
        ));
        assert!(err.to_string().contains("betting_layer1"));
    }

    #[test]
    fn test_same_phase_is_a_no_op() {
        assert_eq!(
            SessionPhase::ResultsLayer1.transition(SessionPhase::ResultsLayer1),
            Ok(SessionPhase::ResultsLayer1)
        );
        assert!(!SessionPhase::ResultsLayer1.can_transition_to(SessionPhase::ResultsLayer1));
    }

    #[test]
    fn test_backwards_is_rejected() {
        assert!(!SessionPhase::BettingLayer2.can_transition_to(SessionPhase::BettingLayer1));
        assert!(!SessionPhase::Insights.can_transition_to(SessionPhase::Waiting));
    }

    #[test]
    fn test_any_open_phase_can_close() {
        for phase in CANONICAL.iter().filter(|p| !p.is_terminal()) {
            assert!(phase.can_transition_to(SessionPhase::Closed));
        }
        assert!(SessionPhase::Closed.allowed_transitions().is_empty());
    }

    #[test]
    fn test_legacy_pair_not_reachable_from_new_sessions() {
        for phase in CANONICAL {
            assert!(!phase.can_transition_to(SessionPhase::Betting));
            assert!(!phase.can_transition_to(SessionPhase::Results));
        }
        assert!(SessionPhase::Betting.can_transition_to(SessionPhase::Results));
    }

    #[test]
    fn test_voting_gates() {
        assert!(SessionPhase::BettingLayer1.accepts(VotingRound::Layer1));
        assert!(SessionPhase::Betting.accepts(VotingRound::Layer1));
        assert!(!SessionPhase::BettingLayer1.accepts(VotingRound::Layer2));
        assert!(SessionPhase::BettingLayer2.accepts(VotingRound::Layer2));
        assert!(!SessionPhase::Routing.accepts(VotingRound::Layer1));
        assert!(!SessionPhase::Routing.accepts(VotingRound::Layer2));
    }

    #[test]
    fn test_result_bearing_phases() {
        let bearing: Vec<_> = [
            CANONICAL.as_slice(),
            &[SessionPhase::Betting, SessionPhase::Results],
        ]
        .concat()
        .into_iter()
        .filter(SessionPhase::is_result_bearing)
        .collect();
        assert_eq!(
            bearing,
            vec![
                SessionPhase::ResultsLayer1,
                SessionPhase::ResultsLayer2,
                SessionPhase::Insights,
                SessionPhase::Results
            ]
        );
    }

    #[test]
    fn test_serde_and_parse_round_trip_legacy_values() {
        let phase: SessionPhase = serde_json::from_str("\"betting\"").unwrap();
        assert_eq!(phase, SessionPhase::Betting);
        assert!(phase.is_legacy());
        assert_eq!(
            serde_json::to_string(&SessionPhase::BettingLayer2).unwrap(),
            "\"betting_layer2\""
        );
        assert_eq!("results_layer1".parse::<SessionPhase>().ok(), Some(SessionPhase::ResultsLayer1));
        assert!("lobby".parse::<SessionPhase>().is_err());
    }
}
