//! Broadcast fan-out for connected displays
//!
//! One tokio broadcast channel per session. Displays subscribe to the
//! session they show; the engine publishes into whichever channel matches
//! the event's session. A channel is dropped once its session closes, which
//! ends every subscriber's stream. Subscribing to a closed session yields a
//! receiver whose stream has already ended.

use casino_application::ports::event_publisher::{SessionEvent, SessionEventPublisher};
use casino_domain::{SessionId, SessionPhase};
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Channel capacity for each session
pub const CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
struct Channels {
    open: HashMap<SessionId, broadcast::Sender<SessionEvent>>,
    closed: HashSet<SessionId>,
}

/// [`SessionEventPublisher`] backed by per-session broadcast channels
pub struct BroadcastEventPublisher {
    capacity: usize,
    channels: RwLock<Channels>,
}

impl BroadcastEventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    /// Lagging subscribers lose the oldest events beyond `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: RwLock::new(Channels::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Channels> {
        self.channels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Channels> {
        self.channels.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to a session's events, opening its channel if needed
    pub fn subscribe(&self, session_id: &SessionId) -> broadcast::Receiver<SessionEvent> {
        if let Some(sender) = self.read().open.get(session_id) {
            return sender.subscribe();
        }

        let mut channels = self.write();
        if channels.closed.contains(session_id) {
            debug!(session_id = %session_id, "Subscription to closed session");
            // Sender dropped on return; the receiver only ever sees Closed
            return broadcast::channel(1).1;
        }
        channels
            .open
            .entry(session_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live subscribers for a session
    pub fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.read()
            .open
            .get(session_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Number of sessions with an open channel
    pub fn open_channels(&self) -> usize {
        self.read().open.len()
    }

    /// Drop a session's channel for good; its subscribers see the stream end
    pub fn close(&self, session_id: &SessionId) {
        let mut channels = self.write();
        channels.open.remove(session_id);
        channels.closed.insert(session_id.clone());
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: SessionEvent) {
        let session_id = event.session_id().clone();
        let event_type = event.event_type();
        let closes = matches!(
            event,
            SessionEvent::PhaseChanged {
                to: SessionPhase::Closed,
                ..
            }
        );

        if let Some(sender) = self.read().open.get(&session_id) {
            // No receivers is fine; displays may not be connected yet
            match sender.send(event) {
                Ok(count) => debug!(event_type, receivers = count, "Event broadcast"),
                Err(_) => debug!(event_type, "Event broadcast (no receivers)"),
            }
        }

        if closes {
            self.close(&session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_domain::ParticipantId;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    fn joined(session: &str, participant: &str) -> SessionEvent {
        SessionEvent::ParticipantJoined {
            session_id: SessionId::new(session),
            participant_id: ParticipantId::new(participant),
        }
    }

    #[tokio::test]
    async fn test_subscribers_only_see_their_session() {
        let publisher = BroadcastEventPublisher::new();
        let mut a = publisher.subscribe(&SessionId::new("a"));
        let mut b = publisher.subscribe(&SessionId::new("b"));

        publisher.publish(joined("a", "p1"));

        assert_eq!(a.recv().await.unwrap(), joined("a", "p1"));
        assert!(matches!(b.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_the_event() {
        let publisher = BroadcastEventPublisher::new();
        let session = SessionId::new("s");
        let mut first = publisher.subscribe(&session);
        let mut second = publisher.subscribe(&session);
        assert_eq!(publisher.subscriber_count(&session), 2);

        publisher.publish(joined("s", "p1"));

        assert_eq!(first.recv().await.unwrap(), joined("s", "p1"));
        assert_eq!(second.recv().await.unwrap(), joined("s", "p1"));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = BroadcastEventPublisher::new();
        publisher.publish(joined("nobody", "p1"));
        assert_eq!(publisher.subscriber_count(&SessionId::new("nobody")), 0);
    }

    #[tokio::test]
    async fn test_closing_phase_ends_the_stream() {
        let publisher = BroadcastEventPublisher::new();
        let session = SessionId::new("s");
        let mut rx = publisher.subscribe(&session);

        let closed = SessionEvent::PhaseChanged {
            session_id: session.clone(),
            from: SessionPhase::Insights,
            to: SessionPhase::Closed,
        };
        publisher.publish(closed.clone());

        assert_eq!(rx.recv().await.unwrap(), closed);
        assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
        assert_eq!(publisher.subscriber_count(&session), 0);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_ends_immediately() {
        let publisher = BroadcastEventPublisher::new();
        let session = SessionId::new("s");
        publisher.publish(SessionEvent::PhaseChanged {
            session_id: session.clone(),
            from: SessionPhase::Waiting,
            to: SessionPhase::Closed,
        });

        let mut late = publisher.subscribe(&session);
        assert!(matches!(late.recv().await, Err(RecvError::Closed)));
        assert_eq!(publisher.subscriber_count(&session), 0);
        assert_eq!(publisher.open_channels(), 0);

        publisher.publish(joined("s", "p1"));
        assert_eq!(publisher.open_channels(), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_oldest() {
        let publisher = BroadcastEventPublisher::with_capacity(2);
        let session = SessionId::new("s");
        let mut rx = publisher.subscribe(&session);

        for i in 0..4 {
            publisher.publish(joined("s", &format!("p{i}")));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(2))));
        assert_eq!(rx.recv().await.unwrap(), joined("s", "p2"));
    }
}
