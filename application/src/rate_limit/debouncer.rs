//! Trailing-edge debouncer
//!
//! Every [`Debouncer::schedule`] replaces the pending arguments and restarts
//! the quiet window. When the window elapses without another call, the action
//! runs once with the latest arguments. [`Debouncer::flush`] runs the pending
//! call immediately.
//!
//! Timers are never aborted: each one carries the generation it was armed
//! for and exits quietly if a newer schedule or a flush superseded it, so an
//! action that already started always runs to completion.

use super::{Action, boxed_action, lock};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct State<T> {
    pending: Option<T>,
    generation: u64,
}

struct Shared<T> {
    action: Action<T>,
    state: Mutex<State<T>>,
}

pub struct Debouncer<T> {
    window: Duration,
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            window: self.window,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
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
                    pending: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Queue `args` and restart the quiet window
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, args: T) {
        let generation = {
            let mut state = lock(&self.shared.state);
            state.pending = Some(args);
            state.generation += 1;
            state.generation
        };

        let shared = Arc::clone(&self.shared);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let args = {
                let mut state = lock(&shared.state);
                if state.generation != generation {
                    return;
                }
                state.pending.take()
            };
            if let Some(args) = args {
                (shared.action)(args).await;
            }
        });
    }

    /// Run the pending call now; returns whether there was one
    pub async fn flush(&self) -> bool {
        let args = {
            let mut state = lock(&self.shared.state);
            state.generation += 1;
            state.pending.take()
        };
        match args {
            Some(args) => {
                (self.shared.action)(args).await;
                true
            }
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.shared.state).pending.is_some()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
