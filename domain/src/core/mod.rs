//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: strongly-typed identifiers for sessions, participants, votes and options
//! - [`percent`]: one-decimal percentage helper used by every aggregate

pub mod ids;
pub mod percent;
