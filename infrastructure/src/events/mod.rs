//! Session event fan-out adapters

mod broadcast;

pub use broadcast::{BroadcastEventPublisher, CHANNEL_CAPACITY};
