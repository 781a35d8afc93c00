//! Infrastructure layer for innovation-casino
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod events;
pub mod logging;
pub mod random;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileCacheConfig, FileCatalogConfig, FileConfig, FileRoutingConfig,
    FileSessionConfig,
};
pub use events::BroadcastEventPublisher;
pub use logging::JsonlEventLog;
pub use random::{SeededRandom, ThreadRandom};
pub use store::InMemorySessionStore;
