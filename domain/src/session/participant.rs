//! Participant entity

use super::vote::VotingRound;
use crate::core::ids::{OptionId, ParticipantId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One registrant of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub session_id: SessionId,
    pub name: String,
    /// Profile field used for department breakdowns
    pub department: String,
    /// Stable per-device id; re-registration from the same device is deduplicated
    pub device_id: String,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub layer1_completed: bool,
    #[serde(default)]
    pub layer2_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer1_submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer2_submitted_at: Option<DateTime<Utc>>,
    /// Round-one routing winner: the round-two group this participant votes in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer1_selection: Option<OptionId>,
}

impl Participant {
    pub fn new(
        session_id: SessionId,
        name: impl Into<String>,
        department: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            id: ParticipantId::generate(),
            session_id,
            name: name.into(),
            department: department.into(),
            device_id: device_id.into(),
            registered_at: Utc::now(),
            layer1_completed: false,
            layer2_completed: false,
            layer1_submitted_at: None,
            layer2_submitted_at: None,
            layer1_selection: None,
        }
    }

    pub fn has_completed(&self, round: VotingRound) -> bool {
        match round {
            VotingRound::Layer1 => self.layer1_completed,
            VotingRound::Layer2 => self.layer2_completed,
        }
    }

    /// Flip the completion flag for `round`
    ///
    /// `selection` is recorded only for round one.
    pub fn mark_completed(
        &mut self,
        round: VotingRound,
        at: DateTime<Utc>,
        selection: Option<OptionId>,
    ) {
        match round {
            VotingRound::Layer1 => {
                self.layer1_completed = true;
                self.layer1_submitted_at = Some(at);
                if selection.is_some() {
                    self.layer1_selection = selection;
                }
            }
            VotingRound::Layer2 => {
                self.layer2_completed = true;
                self.layer2_submitted_at = Some(at);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_completed_round_one_records_selection() {
        let mut participant = Participant::new(SessionId::new("s"), "Ada", "Training", "dev-1");
        assert!(!participant.has_completed(VotingRound::Layer1));

        let now = Utc::now();
        participant.mark_completed(VotingRound::Layer1, now, Some(OptionId::new("a")));

        assert!(participant.has_completed(VotingRound::Layer1));
        assert!(!participant.has_completed(VotingRound::Layer2));
        assert_eq!(participant.layer1_selection, Some(OptionId::new("a")));
        assert_eq!(participant.layer1_submitted_at, Some(now));
    }

    #[test]
    fn test_mark_completed_round_two_keeps_selection() {
        let mut participant = Participant::new(SessionId::new("s"), "Ada", "Training", "dev-1");
        participant.layer1_selection = Some(OptionId::new("a"));

        participant.mark_completed(VotingRound::Layer2, Utc::now(), Some(OptionId::new("b")));

        assert!(participant.layer2_completed);
        assert_eq!(participant.layer1_selection, Some(OptionId::new("a")));
    }
}
