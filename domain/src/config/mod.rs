//! Configuration value objects for the domain layer
//!
//! Loading and merging config files happens in infrastructure; the issue
//! types live here so every layer can report them the same way.

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
