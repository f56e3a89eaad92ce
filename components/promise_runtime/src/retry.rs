//! Retrying work that produces promises.
//!
//! `work` is a factory invoked on the executor; each invocation yields a
//! fresh promise for one attempt. Attempts repeat while they reject, up
//! to the configured count, with [`RetryPolicy`] deciding the pause
//! before each re-attempt.

use core_types::EngineError;
use executor::Executor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::promise::{Promise, Resolver};

/// Backoff policy for re-attempts.
///
/// The pause before re-attempt `n` (after `n` failures) is
/// `base_delay * multiplier^(n - 1)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use promise_runtime::RetryPolicy;
///
/// let policy = RetryPolicy::exponential(Duration::from_millis(100), 2.0);
/// assert_eq!(policy.delay_before_attempt(1), Duration::from_millis(100));
/// assert_eq!(policy.delay_before_attempt(3), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Pause before the first re-attempt.
    pub base_delay: Duration,
    /// Growth factor applied to each subsequent pause.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Re-attempt with no pause at all.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// The same pause before every re-attempt.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            base_delay: delay,
            multiplier: 1.0,
        }
    }

    /// Geometrically growing pauses.
    pub fn exponential(base_delay: Duration, multiplier: f64) -> Self {
        Self {
            base_delay,
            multiplier,
        }
    }

    /// The pause before the next attempt, given how many attempts have
    /// already failed (1-indexed).
    pub fn delay_before_attempt(&self, failures: u32) -> Duration {
        let base = self.base_delay.as_secs_f64();
        let scaled = base * self.multiplier.powi(failures.saturating_sub(1) as i32);
        Duration::from_secs_f64(scaled)
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: EngineError + Clone + Send + 'static,
{
    /// Invokes `work` up to `attempts` times while it rejects, with no
    /// pause between attempts. Fulfills with the first fulfillment;
    /// after the final rejection, rejects with
    /// [`EngineError::retry_exhausted`] of the last error.
    pub fn retry<W>(executor: Arc<dyn Executor>, attempts: u32, work: W) -> Promise<T, E>
    where
        W: FnMut() -> Promise<T, E> + Send + 'static,
    {
        Self::retry_with_policy(executor, attempts, RetryPolicy::immediate(), work)
    }

    /// Like [`retry`](Promise::retry), pausing between attempts per
    /// `policy`.
    pub fn retry_with_policy<W>(
        executor: Arc<dyn Executor>,
        attempts: u32,
        policy: RetryPolicy,
        work: W,
    ) -> Promise<T, E>
    where
        W: FnMut() -> Promise<T, E> + Send + 'static,
    {
        Self::retry_inner(executor, attempts, policy, None, work)
    }

    /// Like [`retry_with_policy`](Promise::retry_with_policy), checking
    /// `token` before every attempt and rejecting with
    /// [`EngineError::cancelled`] once it trips.
    pub fn retry_cancellable<W>(
        executor: Arc<dyn Executor>,
        attempts: u32,
        policy: RetryPolicy,
        token: CancellationToken,
        work: W,
    ) -> Promise<T, E>
    where
        W: FnMut() -> Promise<T, E> + Send + 'static,
    {
        Self::retry_inner(executor, attempts, policy, Some(token), work)
    }

    fn retry_inner<W>(
        executor: Arc<dyn Executor>,
        attempts: u32,
        policy: RetryPolicy,
        token: Option<CancellationToken>,
        work: W,
    ) -> Promise<T, E>
    where
        W: FnMut() -> Promise<T, E> + Send + 'static,
    {
        let (downstream, resolver) = Promise::pending(executor.clone());
        let attempt_executor = executor.clone();
        // The factory always runs on the executor, never on the caller.
        executor.schedule(Box::new(move || {
            run_attempt(
                attempt_executor,
                resolver,
                policy,
                token,
                attempts.max(1),
                1,
                work,
            );
        }));
        downstream
    }
}

fn run_attempt<T, E, W>(
    executor: Arc<dyn Executor>,
    resolver: Resolver<T, E>,
    policy: RetryPolicy,
    token: Option<CancellationToken>,
    attempts: u32,
    attempt: u32,
    mut work: W,
) where
    T: Clone + Send + 'static,
    E: EngineError + Clone + Send + 'static,
    W: FnMut() -> Promise<T, E> + Send + 'static,
{
    if let Some(token) = &token {
        if token.is_cancelled() {
            resolver.reject(E::cancelled());
            return;
        }
    }

    let outcome = work();
    let next_executor = executor.clone();
    outcome.subscribe(
        executor,
        Box::new(move |settlement| match settlement {
            Ok(value) => resolver.resolve(value),
            Err(error) => {
                if attempt >= attempts {
                    resolver.reject(E::retry_exhausted(error));
                    return;
                }
                let pause = policy.delay_before_attempt(attempt);
                let recurse_executor = next_executor.clone();
                let next: executor::Work = Box::new(move || {
                    run_attempt(
                        recurse_executor,
                        resolver,
                        policy,
                        token,
                        attempts,
                        attempt + 1,
                        work,
                    );
                });
                if pause.is_zero() {
                    next_executor.schedule(next);
                } else {
                    next_executor.schedule_after(pause, next);
                }
            }
        }),
    );
}
