//! Session entity, settings and counters

use super::phase::SessionPhase;
use super::vote::VotingRound;
use crate::allocation::required_budget;
use crate::catalog::OptionCatalog;
use crate::core::ids::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CHIPS_PER_TYPE: u32 = 4;
pub const DEFAULT_LAYER_DURATION_SECS: u32 = 7 * 60;

/// Settings no session can run with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("chips_per_type must be at least 1")]
    ZeroChipsPerType,
}

/// Per-round timer lengths, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDurations {
    pub layer1: u32,
    pub layer2: u32,
}

impl Default for LayerDurations {
    fn default() -> Self {
        Self {
            layer1: DEFAULT_LAYER_DURATION_SECS,
            layer2: DEFAULT_LAYER_DURATION_SECS,
        }
    }
}

impl LayerDurations {
    pub fn for_round(&self, round: VotingRound) -> u32 {
        match round {
            VotingRound::Layer1 => self.layer1,
            VotingRound::Layer2 => self.layer2,
        }
    }
}

/// Facilitator-controlled session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Chips of each type (time, talent, trust) every participant must place
    pub chips_per_type: u32,
    pub layer_durations: LayerDurations,
    /// Registration requires a non-blank department
    pub require_department: bool,
    /// Recorded for displays; votes stay immutable either way
    pub allow_revotes: bool,
    /// Join URL shown to participants, without a trailing slash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_base_url: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            chips_per_type: DEFAULT_CHIPS_PER_TYPE,
            layer_durations: LayerDurations::default(),
            require_department: true,
            allow_revotes: false,
            participant_base_url: None,
        }
    }
}

impl SessionSettings {
    /// Total chips each allocation must place
    pub fn required_chips(&self) -> u64 {
        required_budget(self.chips_per_type)
    }

    /// Reject settings under which no allocation could route a participant
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.chips_per_type == 0 {
            return Err(SettingsError::ZeroChipsPerType);
        }
        Ok(())
    }

    /// Apply a facilitator override on top of these settings
    pub fn with_override(mut self, patch: &SettingsOverride) -> Self {
        if let Some(chips) = patch.chips_per_type {
            self.chips_per_type = chips;
        }
        if let Some(secs) = patch.layer1_duration_secs {
            self.layer_durations.layer1 = secs;
        }
        if let Some(secs) = patch.layer2_duration_secs {
            self.layer_durations.layer2 = secs;
        }
        if let Some(required) = patch.require_department {
            self.require_department = required;
        }
        if let Some(allow) = patch.allow_revotes {
            self.allow_revotes = allow;
        }
        if let Some(url) = &patch.participant_base_url {
            self.participant_base_url = Some(url.clone());
        }
        self.participant_base_url = self
            .participant_base_url
            .as_deref()
            .and_then(sanitize_base_url);
        self
    }
}

/// Partial settings supplied when a session is created
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverride {
    pub chips_per_type: Option<u32>,
    pub layer1_duration_secs: Option<u32>,
    pub layer2_duration_secs: Option<u32>,
    pub require_department: Option<bool>,
    pub allow_revotes: Option<bool>,
    pub participant_base_url: Option<String>,
}

fn sanitize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.trim_end_matches('/').to_string())
}

/// Display counters; never read by results aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub total_participants: u64,
    pub layer1_allocations: u64,
    pub layer2_allocations: u64,
    pub total_allocations: u64,
}

impl SessionMetadata {
    /// Count one committed vote; keeps `total_allocations` equal to the sum
    pub fn record_vote(&mut self, round: VotingRound) {
        match round {
            VotingRound::Layer1 => self.layer1_allocations += 1,
            VotingRound::Layer2 => self.layer2_allocations += 1,
        }
        self.total_allocations = self.layer1_allocations + self.layer2_allocations;
    }

    pub fn record_participant(&mut self) {
        self.total_participants += 1;
    }

    pub fn allocations(&self, round: VotingRound) -> u64 {
        match round {
            VotingRound::Layer1 => self.layer1_allocations,
            VotingRound::Layer2 => self.layer2_allocations,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_allocations == self.layer1_allocations + self.layer2_allocations
    }
}

/// One voting event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub facilitator_id: String,
    pub created_at: DateTime<Utc>,
    pub phase: SessionPhase,
    pub catalog: OptionCatalog,
    pub settings: SessionSettings,
    #[serde(default)]
    pub metadata: SessionMetadata,
}

impl Session {
    pub fn new(
        facilitator_id: impl Into<String>,
        catalog: OptionCatalog,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            facilitator_id: facilitator_id.into(),
            created_at: Utc::now(),
            phase: SessionPhase::Waiting,
            catalog,
            settings,
            metadata: SessionMetadata::default(),
        }
    }

    /// Join link for participants, when a base URL is configured
    pub fn join_url(&self) -> Option<String> {
        self.settings
            .participant_base_url
            .as_ref()
            .map(|base| format!("{}/join?session={}", base, self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SessionSettings::default();
        assert_eq!(settings.chips_per_type, 4);
        assert_eq!(settings.required_chips(), 12);
        assert_eq!(settings.layer_durations.for_round(VotingRound::Layer2), 420);
        assert!(settings.require_department);
        assert!(!settings.allow_revotes);
    }

    #[test]
    fn test_override_merges_only_present_fields() {
        let patch = SettingsOverride {
            chips_per_type: Some(5),
            layer2_duration_secs: Some(300),
            ..Default::default()
        };
        let settings = SessionSettings::default().with_override(&patch);
        assert_eq!(settings.chips_per_type, 5);
        assert_eq!(settings.layer_durations.layer1, 420);
        assert_eq!(settings.layer_durations.layer2, 300);
        assert!(settings.require_department);
    }

    #[test]
    fn test_zero_chip_budget_is_invalid() {
        assert!(SessionSettings::default().validate().is_ok());

        let patch = SettingsOverride {
            chips_per_type: Some(0),
            ..Default::default()
        };
        let settings = SessionSettings::default().with_override(&patch);
        assert_eq!(settings.validate(), Err(SettingsError::ZeroChipsPerType));
    }

    #[test]
    fn test_base_url_is_sanitized() {
        let patch = SettingsOverride {
            participant_base_url: Some("  https://casino.example.com/  ".to_string()),
            ..Default::default()
        };
        let settings = SessionSettings::default().with_override(&patch);
        assert_eq!(
            settings.participant_base_url.as_deref(),
            Some("https://casino.example.com")
        );

        let blank = SettingsOverride {
            participant_base_url: Some("   ".to_string()),
            ..Default::default()
        };
        let settings = SessionSettings::default().with_override(&blank);
        assert!(settings.participant_base_url.is_none());
    }

    #[test]
    fn test_metadata_total_tracks_sum() {
        let mut metadata = SessionMetadata::default();
        metadata.record_vote(VotingRound::Layer1);
        metadata.record_vote(VotingRound::Layer1);
        metadata.record_vote(VotingRound::Layer2);
        assert_eq!(metadata.layer1_allocations, 2);
        assert_eq!(metadata.layer2_allocations, 1);
        assert_eq!(metadata.total_allocations, 3);
        assert!(metadata.is_consistent());
    }

    #[test]
    fn test_new_session_starts_waiting() {
        let session = Session::new("facilitator", OptionCatalog::default_catalog(), SessionSettings::default());
        assert_eq!(session.phase, SessionPhase::Waiting);
        assert_eq!(session.metadata, SessionMetadata::default());
        assert!(session.join_url().is_none());
    }
}
