//! Time-based combinators: `timeout` and `delay`.

use core_types::EngineError;
use executor::Executor;
use std::sync::Arc;
use std::time::Duration;

use crate::promise::Promise;

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Passes the fulfillment through after `duration`; rejections
    /// propagate immediately, undelayed.
    pub fn delay(&self, duration: Duration) -> Promise<T, E> {
        self.delay_on(self.executor.clone(), duration)
    }

    /// Like [`delay`](Promise::delay), scheduling on `executor`.
    pub fn delay_on(&self, executor: Arc<dyn Executor>, duration: Duration) -> Promise<T, E> {
        let timer_executor = executor.clone();
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => timer_executor.schedule_after(
                duration,
                Box::new(move || resolver.resolve(value)),
            ),
            Err(error) => resolver.reject(error),
        })
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: EngineError + Clone + Send + 'static,
{
    /// Races this promise against a timer: if the timer fires first, the
    /// downstream rejects with [`EngineError::timed_out`]; otherwise the
    /// settlement passes through and the late timer is an idempotent
    /// no-op.
    pub fn timeout(&self, duration: Duration) -> Promise<T, E> {
        self.timeout_on(self.executor.clone(), duration)
    }

    /// Like [`timeout`](Promise::timeout), scheduling on `executor`.
    pub fn timeout_on(&self, executor: Arc<dyn Executor>, duration: Duration) -> Promise<T, E> {
        let (mut downstream, resolver) = Promise::pending(executor.clone());
        downstream.cancel = self.cancel.clone();

        let forward = resolver.clone();
        self.subscribe(
            executor.clone(),
            Box::new(move |settlement| forward.settle(settlement)),
        );
        executor.schedule_after(duration, Box::new(move || resolver.reject(E::timed_out())));
        downstream
    }
}
