//! Results aggregation
//!
//! Turns the immutable vote set of a session into the document displays
//! render: per-option chip totals for round one, per-group totals with a
//! boldness-tier rollup for round two, and a department breakdown for both.

mod aggregate;
mod department;
pub mod types;

pub use aggregate::aggregate;
pub use department::aggregate_departments;
pub use types::{
    ChipPercentages, ChipTotals, DepartmentInsights, DepartmentStats, GroupResults, LayerResults,
    OptionResults, ResultsSummary, SessionResults, TierRollup,
};
