//! Leading-edge throttler with a single pending slot
//!
//! The first [`Throttler::call`] runs immediately. Calls arriving while it
//! runs, or before its window closes, overwrite one pending slot; when the
//! window closes the pending call (if any) runs with the latest arguments
//! and opens a new window. At most one call is ever in flight.

use super::{Action, boxed_action, lock};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// What happened to a throttled call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleOutcome {
    /// Started right away
    Started,
    /// Stored as the pending call, replacing any earlier pending one
    Queued,
}

struct State<T> {
    running: bool,
    pending: Option<T>,
}

struct Shared<T> {
    action: Action<T>,
    state: Mutex<State<T>>,
}

pub struct Throttler<T> {
    window: Duration,
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Throttler<T> {
    fn clone(&self) -> Self {
        Self {
            window: self.window,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Throttler<T> {
    pub fn new<F, Fut>(window: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            window,
            shared: Arc::new(Shared {
                action: boxed_action(action),
                state: Mutex::new(State {
                    running: false,
                    pending: None,
                }),
            }),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn call(&self, args: T) -> ThrottleOutcome {
        {
            let mut state = lock(&self.shared.state);
            if state.running {
                state.pending = Some(args);
                return ThrottleOutcome::Queued;
            }
            state.running = true;
        }

        tokio::spawn(Self::drive(Arc::clone(&self.shared), self.window, args));
        ThrottleOutcome::Started
    }

    /// No call running and none pending
    pub fn is_idle(&self) -> bool {
        let state = lock(&self.shared.state);
        !state.running && state.pending.is_none()
    }

    async fn drive(shared: Arc<Shared<T>>, window: Duration, first: T) {
        let mut args = first;
        loop {
            let started = Instant::now();
            (shared.action)(args).await;
            tokio::time::sleep_until(started + window).await;

            let next = {
                let mut state = lock(&shared.state);
                match state.pending.take() {
                    Some(next) => next,
                    None => {
                        state.running = false;
                        return;
                    }
                }
            };
            args = next;
        }
    }
}
