//! Port for session event fan-out.
//!
//! Defines the [`SessionEventPublisher`] trait that receives an event after
//! each successful engine operation. Adapters push them to connected
//! displays (broadcast channels) or to an audit trail (JSONL).

use casino_domain::{ParticipantId, SessionId, SessionPhase, VoteId, VotingRound};
use serde::Serialize;
use std::sync::Arc;

/// An event emitted after an engine operation succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseChanged {
        session_id: SessionId,
        from: SessionPhase,
        to: SessionPhase,
    },
    ParticipantJoined {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    VoteSubmitted {
        session_id: SessionId,
        participant_id: ParticipantId,
        round: VotingRound,
        vote_id: VoteId,
    },
    ResultsUpdated {
        session_id: SessionId,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::PhaseChanged { session_id, .. }
            | SessionEvent::ParticipantJoined { session_id, .. }
            | SessionEvent::VoteSubmitted { session_id, .. }
            | SessionEvent::ResultsUpdated { session_id } => session_id,
        }
    }

    /// Stable event type identifier (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::PhaseChanged { .. } => "phase_changed",
            SessionEvent::ParticipantJoined { .. } => "participant_joined",
            SessionEvent::VoteSubmitted { .. } => "vote_submitted",
            SessionEvent::ResultsUpdated { .. } => "results_updated",
        }
    }
}

/// Port for publishing session events.
///
/// `publish` is synchronous and non-fallible: a slow or broken subscriber
/// must never fail the operation that produced the event.
pub trait SessionEventPublisher: Send + Sync {
    fn publish(&self, event: SessionEvent);
}

/// No-op implementation for tests and when fan-out is disabled.
pub struct NoEventPublisher;

impl SessionEventPublisher for NoEventPublisher {
    fn publish(&self, _event: SessionEvent) {}
}

/// A publisher that delegates to multiple inner publishers.
///
/// ```text
/// VotingEngine ──publish──▶ CompositePublisher
///                              ├─▶ BroadcastEventPublisher (displays)
///                              └─▶ JsonlEventLog (audit trail)
/// ```
#[derive(Default)]
pub struct CompositePublisher {
    delegates: Vec<Arc<dyn SessionEventPublisher>>,
}

impl CompositePublisher {
    pub fn new(delegates: Vec<Arc<dyn SessionEventPublisher>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, publisher: Arc<dyn SessionEventPublisher>) {
        self.delegates.push(publisher);
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl SessionEventPublisher for CompositePublisher {
    fn publish(&self, event: SessionEvent) {
        for d in &self.delegates {
            d.publish(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl SessionEventPublisher for Recorder {
        fn publish(&self, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let composite = CompositePublisher::new(vec![a.clone(), b.clone()]);

        composite.publish(SessionEvent::ResultsUpdated {
            session_id: SessionId::new("s1"),
        });

        assert_eq!(a.events.lock().unwrap().len(), 1);
        assert_eq!(b.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = SessionEvent::PhaseChanged {
            session_id: SessionId::new("s1"),
            from: SessionPhase::Waiting,
            to: SessionPhase::BettingLayer1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_changed");
        assert_eq!(json["type"], event.event_type());
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["to"], "betting_layer1");
    }
}
