//! Blocking helpers for synchronous boundaries.
//!
//! Nothing inside the engine ever blocks; these helpers exist for the
//! edges — tests, `main`, FFI shims — where a thread genuinely wants to
//! sit and wait for a settlement. They register a plain observer and
//! park on a channel, so the promise must be driven by an executor that
//! runs without this thread's help (a worker pool). With a
//! [`SerialExecutor`](executor::SerialExecutor), drive the executor
//! first and then use [`wait_for`] with a zero-ish timeout.

use core_types::Settlement;
use crossbeam::channel;
use std::time::Duration;

use crate::promise::Promise;

/// Blocks until the promise settles and returns the settlement.
///
/// Returns `None` only if the settlement can no longer be delivered
/// because the work item carrying it was discarded (delayed work dropped
/// during executor shutdown, for example). A promise whose producer
/// never settles it keeps this call blocked; prefer [`wait_for`] when
/// that is a possibility.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use executor::{PoolConfig, ThreadPoolExecutor};
/// use promise_runtime::{sync, Promise};
///
/// let pool = Arc::new(ThreadPoolExecutor::new(PoolConfig { workers: 2 }));
/// let (promise, resolver) = Promise::<i32, String>::pending(pool);
/// let pipeline = promise.then(|n| n + 1);
/// resolver.resolve(41);
/// assert_eq!(sync::wait(&pipeline), Some(Ok(42)));
/// ```
pub fn wait<T, E>(promise: &Promise<T, E>) -> Option<Settlement<T, E>>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let (sender, receiver) = channel::bounded(1);
    promise.observe(move |settlement| {
        let _ = sender.send(settlement);
    });
    receiver.recv().ok()
}

/// Blocks until the promise settles or `timeout` elapses.
///
/// `None` means the settlement did not arrive in time — the promise may
/// still settle later.
pub fn wait_for<T, E>(promise: &Promise<T, E>, timeout: Duration) -> Option<Settlement<T, E>>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let (sender, receiver) = channel::bounded(1);
    promise.observe(move |settlement| {
        let _ = sender.send(settlement);
    });
    receiver.recv_timeout(timeout).ok()
}
