//! Results document types
//!
//! Everything here is derived from the vote set and the option catalog. The
//! document carries no timestamps, so recomputing it over an unchanged vote
//! set serializes to identical bytes.

use crate::allocation::ChipAllocation;
use crate::catalog::BoldnessTier;
use crate::core::ids::{OptionId, SessionId};
use crate::core::percent::percentage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-type chip sums for one option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChipTotals {
    pub time: u64,
    pub talent: u64,
    pub trust: u64,
    pub total_chips: u64,
}

impl ChipTotals {
    pub fn add(&mut self, chips: &ChipAllocation) {
        self.time += u64::from(chips.time);
        self.talent += u64::from(chips.talent);
        self.trust += u64::from(chips.trust);
        self.total_chips += chips.total();
    }

    /// Share of each chip type within this option's own total
    pub fn percentages(&self) -> ChipPercentages {
        ChipPercentages {
            time: percentage(self.time, self.total_chips),
            talent: percentage(self.talent, self.total_chips),
            trust: percentage(self.trust, self.total_chips),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChipPercentages {
    pub time: f64,
    pub talent: f64,
    pub trust: f64,
}

/// Aggregate for one catalog option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResults {
    pub option_id: OptionId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boldness: Option<BoldnessTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub totals: ChipTotals,
    pub percentages: ChipPercentages,
}

/// Aggregate for one round (or one round-two group)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerResults {
    pub total_allocations: u64,
    pub total_chips: u64,
    /// Every configured option in catalog order, including zero-chip ones
    pub options: Vec<OptionResults>,
}

impl LayerResults {
    pub fn option(&self, id: &OptionId) -> Option<&OptionResults> {
        self.options.iter().find(|o| &o.option_id == id)
    }
}

/// Boldness-tier rollup within one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRollup {
    pub tier: BoldnessTier,
    pub label: String,
    pub total_chips: u64,
    /// Share of the group's chips, one decimal place
    pub share: f64,
    /// Distinct participants who placed at least one chip in this tier
    pub participant_count: u64,
}

/// Round-two aggregate for one group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupResults {
    #[serde(flatten)]
    pub results: LayerResults,
    /// One entry per tier, in canonical tier order
    pub boldness: Vec<TierRollup>,
}

impl GroupResults {
    pub fn tier(&self, tier: BoldnessTier) -> Option<&TierRollup> {
        self.boldness.iter().find(|t| t.tier == tier)
    }
}

/// Per-department figures for one round
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentStats {
    pub total_chips: u64,
    pub total_participants: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_option_id: Option<OptionId>,
    pub top_option_chips: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentInsights {
    pub layer1: BTreeMap<String, DepartmentStats>,
    pub layer2: BTreeMap<String, DepartmentStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_participants: u64,
    pub layer1_allocations: u64,
    pub layer2_allocations: u64,
    pub total_layer1_chips: u64,
    pub total_layer2_chips: u64,
}

/// The full results document of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub session_id: SessionId,
    pub summary: ResultsSummary,
    pub layer1: LayerResults,
    /// Keyed by round-one option id; every configured group is present
    pub layer2: BTreeMap<OptionId, GroupResults>,
    pub departments: DepartmentInsights,
}
