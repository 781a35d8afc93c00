//! Chip primitives

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three chip types every participant spends
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipType {
    Time,
    Talent,
    Trust,
}

impl ChipType {
    pub const ALL: [ChipType; 3] = [ChipType::Time, ChipType::Talent, ChipType::Trust];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChipType::Time => "time",
            ChipType::Talent => "talent",
            ChipType::Trust => "trust",
        }
    }
}

impl fmt::Display for ChipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated chip counts placed on one option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChipAllocation {
    pub time: u32,
    pub talent: u32,
    pub trust: u32,
}

impl ChipAllocation {
    pub fn new(time: u32, talent: u32, trust: u32) -> Self {
        Self {
            time,
            talent,
            trust,
        }
    }

    /// Chips of every type placed on this option
    pub fn total(&self) -> u64 {
        u64::from(self.time) + u64::from(self.talent) + u64::from(self.trust)
    }

    pub fn get(&self, chip: ChipType) -> u32 {
        match chip {
            ChipType::Time => self.time,
            ChipType::Talent => self.talent,
            ChipType::Trust => self.trust,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Chip counts as submitted by a client, before validation
///
/// Counts are signed so that negative values survive deserialization and can
/// be reported precisely; non-integer JSON numbers fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmittedChips {
    pub time: i64,
    pub talent: i64,
    pub trust: i64,
}

impl SubmittedChips {
    pub fn new(time: i64, talent: i64, trust: i64) -> Self {
        Self {
            time,
            talent,
            trust,
        }
    }

    pub fn get(&self, chip: ChipType) -> i64 {
        match chip {
            ChipType::Time => self.time,
            ChipType::Talent => self.talent,
            ChipType::Trust => self.trust,
        }
    }
}

impl From<ChipAllocation> for SubmittedChips {
    fn from(chips: ChipAllocation) -> Self {
        Self {
            time: i64::from(chips.time),
            talent: i64::from(chips.talent),
            trust: i64::from(chips.trust),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        assert_eq!(ChipAllocation::new(4, 4, 4).total(), 12);
        assert_eq!(ChipAllocation::default().total(), 0);
        assert!(ChipAllocation::default().is_empty());
    }

    #[test]
    fn test_submitted_missing_fields_default_to_zero() {
        let chips: SubmittedChips = serde_json::from_str(r#"{"time": 3}"#).unwrap();
        assert_eq!(chips, SubmittedChips::new(3, 0, 0));
    }

    #[test]
    fn test_submitted_rejects_fractional_counts() {
        let result: Result<SubmittedChips, _> = serde_json::from_str(r#"{"time": 1.5}"#);
        assert!(result.is_err());
    }
}
