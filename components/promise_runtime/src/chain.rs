//! Single-upstream combinators: the chaining algebra.
//!
//! Every combinator here registers one continuation on the upstream
//! promise and returns the downstream promise that continuation will
//! settle. The downstream handle inherits the upstream chain context
//! (default executor and cancellation token); `*_on` variants run the
//! stage on an explicit executor instead.

use core_types::Settlement;
use executor::Executor;
use std::sync::Arc;

use crate::promise::{Promise, Resolver};

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Builds a downstream promise settled by `stage`, which receives
    /// the upstream settlement and the downstream resolver.
    ///
    /// Cancellation is checked twice: at registration (an already-tripped
    /// token rejects the downstream without subscribing a stage at all)
    /// and when the upstream settles, before the stage body runs.
    pub(crate) fn chain_on<U, F>(&self, executor: Arc<dyn Executor>, stage: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Settlement<T, E>, Resolver<U, E>) + Send + 'static,
    {
        let (mut downstream, resolver) = Promise::pending(executor.clone());
        downstream.cancel = self.cancel.clone();

        let cancel = self.cancel.clone();
        if let Some(context) = &cancel {
            if context.is_cancelled() {
                resolver.reject(context.cancelled_error());
                return downstream;
            }
        }

        self.subscribe(
            executor,
            Box::new(move |settlement| {
                if let Some(context) = &cancel {
                    if context.is_cancelled() {
                        resolver.reject(context.cancelled_error());
                        return;
                    }
                }
                stage(settlement, resolver);
            }),
        );
        downstream
    }

    /// Transforms the fulfillment value; rejections propagate untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use executor::SerialExecutor;
    /// use promise_runtime::Promise;
    ///
    /// let serial = Arc::new(SerialExecutor::new());
    /// let (promise, resolver) = Promise::<i32, String>::pending(serial.clone());
    /// let doubled = promise.then(|n| n * 2);
    /// resolver.resolve(21);
    /// serial.run_until_idle();
    /// assert!(doubled.state().is_fulfilled());
    /// ```
    pub fn then<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then_on(self.executor.clone(), f)
    }

    /// Like [`then`](Promise::then), running `f` on `executor`.
    pub fn then_on<U, F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => resolver.resolve(f(value)),
            Err(error) => resolver.reject(error),
        })
    }

    /// Transforms the fulfillment value with a fallible stage: an `Err`
    /// converts the downstream outcome to a rejection carrying it.
    pub fn try_then<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.try_then_on(self.executor.clone(), f)
    }

    /// Like [`try_then`](Promise::try_then), running `f` on `executor`.
    pub fn try_then_on<U, F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => resolver.settle(f(value)),
            Err(error) => resolver.reject(error),
        })
    }

    /// Chains a stage that itself returns a promise; the downstream
    /// adopts the inner promise's eventual outcome.
    pub fn and_then<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U, E> + Send + 'static,
    {
        self.and_then_on(self.executor.clone(), f)
    }

    /// Like [`and_then`](Promise::and_then), running `f` on `executor`.
    pub fn and_then_on<U, F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U, E> + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => resolver.adopt(f(value)),
            Err(error) => resolver.reject(error),
        })
    }

    /// Converts a rejection back into the value path; fulfillments
    /// propagate untouched.
    pub fn catch<F>(&self, f: F) -> Promise<T, E>
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        self.catch_on(self.executor.clone(), f)
    }

    /// Like [`catch`](Promise::catch), running `f` on `executor`.
    pub fn catch_on<F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<T, E>
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => resolver.resolve(value),
            Err(error) => resolver.resolve(f(error)),
        })
    }

    /// Handles a rejection with a stage that returns a promise; the
    /// downstream adopts its outcome. Fulfillments propagate untouched.
    pub fn recover<F>(&self, f: F) -> Promise<T, E>
    where
        F: FnOnce(E) -> Promise<T, E> + Send + 'static,
    {
        self.recover_on(self.executor.clone(), f)
    }

    /// Like [`recover`](Promise::recover), running `f` on `executor`.
    pub fn recover_on<F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<T, E>
    where
        F: FnOnce(E) -> Promise<T, E> + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| match settlement {
            Ok(value) => resolver.resolve(value),
            Err(error) => resolver.adopt(f(error)),
        })
    }

    /// Runs `f` on settlement regardless of path, then passes the
    /// settlement through unchanged.
    pub fn always<F>(&self, f: F) -> Promise<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        self.always_on(self.executor.clone(), f)
    }

    /// Like [`always`](Promise::always), running `f` on `executor`.
    pub fn always_on<F>(&self, executor: Arc<dyn Executor>, f: F) -> Promise<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        self.chain_on(executor, move |settlement, resolver| {
            f();
            resolver.settle(settlement);
        })
    }
}
