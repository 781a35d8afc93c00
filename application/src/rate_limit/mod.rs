//! Read-path protection for live rounds
//!
//! During a betting phase every phone submits within the same few minutes
//! while projector displays poll for results. These types keep that burst
//! away from the aggregation engine and the store:
//!
//! ```text
//! submit ──▶ Debouncer ──(quiet window)──▶ recompute ──▶ TtlCache
//! display poll ──▶ Throttler ──(≤1 per window)──▶ recompute
//! display read ──▶ TtlCache hit? ──no──▶ store / recompute
//! ```
//!
//! Timers use `tokio::time`, so tests drive them on a paused clock.

pub mod debouncer;
pub mod throttler;
pub mod ttl_cache;

pub use debouncer::Debouncer;
pub use throttler::{ThrottleOutcome, Throttler};
pub use ttl_cache::TtlCache;

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Type-erased async callback shared by the rate limiters
pub(crate) type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

pub(crate) fn boxed_action<T, F, Fut>(action: F) -> Action<T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |args: T| -> BoxFuture<'static, ()> { Box::pin(action(args)) })
}

/// Lock that survives a panicked holder; the guarded state stays consistent
/// because every critical section is a plain field update.
pub(crate) fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
