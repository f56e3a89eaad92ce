//! Bridge to `std::future::Future`.
//!
//! Promise pipelines compose with async Rust at the boundary: consuming
//! a promise as a future registers one observer that stores the outcome
//! and wakes the task. The future resolves to the [`Settlement`], so
//! `.await?` works naturally in fallible async code.

use core_types::Settlement;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::promise::Promise;

struct FutureState<T, E> {
    outcome: Option<Settlement<T, E>>,
    waker: Option<Waker>,
}

/// A [`Promise`] consumed as a `std` future.
///
/// Created by [`Promise::into_future`]. The promise's executor must be
/// running (or be driven) for the future to complete.
pub struct PromiseFuture<T, E> {
    state: Arc<Mutex<FutureState<T, E>>>,
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Consumes this handle into a future yielding the settlement.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use executor::{PoolConfig, ThreadPoolExecutor};
    /// use promise_runtime::Promise;
    ///
    /// let pool = Arc::new(ThreadPoolExecutor::new(PoolConfig { workers: 1 }));
    /// let (promise, resolver) = Promise::<i32, String>::pending(pool);
    /// resolver.resolve(8);
    /// let settlement = futures::executor::block_on(promise.into_future());
    /// assert_eq!(settlement, Ok(8));
    /// ```
    pub fn into_future(self) -> PromiseFuture<T, E> {
        let state = Arc::new(Mutex::new(FutureState {
            outcome: None,
            waker: None,
        }));
        let shared = state.clone();
        self.observe(move |settlement| {
            let waker = {
                let mut state = shared.lock();
                state.outcome = Some(settlement);
                state.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        });
        PromiseFuture { state }
    }
}

impl<T, E> Future for PromiseFuture<T, E> {
    type Output = Settlement<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.lock();
        match state.outcome.take() {
            Some(settlement) => Poll::Ready(settlement),
            None => {
                // Keep only the most recent waker; this future has a
                // single consumer.
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
