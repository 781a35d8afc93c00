//! Allocation model
//!
//! One participant's spend for one round: option id → chip counts. A raw
//! [`AllocationRequest`] becomes an [`Allocation`] only after
//! [`Allocation::validate`] has checked it against the legal option set and
//! the chip budget.

pub mod chips;
pub mod routing;

pub use chips::{ChipAllocation, ChipType, SubmittedChips};
pub use routing::routing_winner;

use crate::catalog::OptionSet;
use crate::core::ids::OptionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Allocation as received from a client
pub type AllocationRequest = BTreeMap<OptionId, SubmittedChips>;

/// Reasons an allocation is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Option {0} is not available in this round")]
    InvalidOption(OptionId),

    #[error("Invalid {chip} count {value} for option {option}")]
    InvalidAllocation {
        option: OptionId,
        chip: ChipType,
        value: i64,
    },

    #[error("Allocations must use all {expected} chips (got {actual})")]
    BudgetMismatch { expected: u64, actual: u64 },
}

/// Total chips a participant must place: `chips_per_type` of each type
pub fn required_budget(chips_per_type: u32) -> u64 {
    u64::from(chips_per_type) * ChipType::ALL.len() as u64
}

/// A validated allocation whose chips sum exactly to the budget
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(BTreeMap<OptionId, ChipAllocation>);

impl Allocation {
    /// Validate a raw request against the legal options and the chip budget
    ///
    /// Checks run in order: option membership, count range, then budget.
    pub fn validate(
        request: &AllocationRequest,
        legal: &OptionSet<'_>,
        chips_per_type: u32,
    ) -> Result<Self, AllocationError> {
        let mut entries = BTreeMap::new();
        let mut placed: u64 = 0;

        for (option, submitted) in request {
            if !legal.contains(option) {
                return Err(AllocationError::InvalidOption(option.clone()));
            }

            let mut counts = [0u32; 3];
            for (slot, chip) in counts.iter_mut().zip(ChipType::ALL) {
                let value = submitted.get(chip);
                *slot = u32::try_from(value).map_err(|_| AllocationError::InvalidAllocation {
                    option: option.clone(),
                    chip,
                    value,
                })?;
            }

            let chips = ChipAllocation::new(counts[0], counts[1], counts[2]);
            placed += chips.total();
            entries.insert(option.clone(), chips);
        }

        let expected = required_budget(chips_per_type);
        if placed != expected {
            return Err(AllocationError::BudgetMismatch {
                expected,
                actual: placed,
            });
        }

        Ok(Self(entries))
    }

    /// Sum of every chip across every option
    pub fn total_chips(&self) -> u64 {
        self.0.values().map(ChipAllocation::total).sum()
    }

    pub fn get(&self, option: &OptionId) -> Option<&ChipAllocation> {
        self.0.get(option)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OptionId, &ChipAllocation)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build an allocation without validation (stored records, fixtures)
    pub fn from_entries(entries: impl IntoIterator<Item = (OptionId, ChipAllocation)>) -> Self {
        Self(entries.into_iter().collect())
    }
}
