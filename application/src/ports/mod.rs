//! Port definitions (interfaces for external adapters)
//!
//! Ports define the boundaries between the application layer and
//! infrastructure. Adapters in the infrastructure layer implement these
//! traits.

pub mod event_publisher;
pub mod random_source;
pub mod session_store;
