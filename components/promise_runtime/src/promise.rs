//! The promise state machine.
//!
//! A [`Promise`] is a shared handle to a value that becomes available
//! asynchronously, or fails, at most once. State lives behind a single
//! mutex: `Pending` holds the ordered observer list, `Settled` holds the
//! immutable outcome. Settling and observer-list manipulation share that
//! one critical section, so concurrent `resolve`/`reject`/`observe`
//! calls can never corrupt the list or fire an observer twice; actual
//! observer dispatch happens after the lock is released, always through
//! an [`Executor`], never inline on the calling thread.
//!
//! Producers hold a [`Resolver`], consumers hold the [`Promise`]. Both
//! are cheap clones of the same shared state; the state lives as long as
//! the longest holder. Dropping an unresolved promise is not an error —
//! it is simply garbage.

use core_types::{PromiseState, Settlement};
use executor::Executor;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::cancel::CancelContext;

/// A continuation registered on a pending promise.
pub(crate) type Callback<T, E> = Box<dyn FnOnce(Settlement<T, E>) + Send>;

/// A registered continuation plus the executor it must run on.
struct Observer<T, E> {
    executor: Arc<dyn Executor>,
    callback: Callback<T, E>,
}

impl<T, E> Observer<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Hands the callback to its executor with the given outcome.
    fn fire(self, settlement: Settlement<T, E>) {
        let Observer { executor, callback } = self;
        executor.schedule(Box::new(move || callback(settlement)));
    }
}

enum State<T, E> {
    Pending { observers: Vec<Observer<T, E>> },
    Settled(Settlement<T, E>),
}

struct Shared<T, E> {
    state: Mutex<State<T, E>>,
}

impl<T, E> Shared<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Registers an observer, firing it immediately (via its executor)
    /// when the promise has already settled.
    fn register(&self, observer: Observer<T, E>) {
        let settlement = {
            let mut state = self.state.lock();
            match &mut *state {
                State::Pending { observers } => {
                    observers.push(observer);
                    return;
                }
                State::Settled(settlement) => settlement.clone(),
            }
        };
        observer.fire(settlement);
    }

    /// Transitions Pending -> Settled and fires the drained observers in
    /// registration order. A no-op when already settled.
    fn settle(&self, settlement: Settlement<T, E>) {
        let drained = {
            let mut state = self.state.lock();
            if matches!(&*state, State::Settled(_)) {
                return;
            }
            match std::mem::replace(&mut *state, State::Settled(settlement.clone())) {
                State::Pending { observers } => observers,
                State::Settled(_) => Vec::new(),
            }
        };
        for observer in drained {
            observer.fire(settlement.clone());
        }
    }
}

/// A handle to a value of type `T` that becomes available
/// asynchronously, or fails with an error of type `E`.
///
/// Handles are cheap to clone; every clone refers to the same underlying
/// state. The handle also carries the chain context inherited by
/// downstream promises: the default executor for continuations and an
/// optional cancellation token.
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
/// assert!(promise.state().is_pending());
///
/// resolver.resolve(42);
/// serial.run_until_idle();
/// assert!(promise.state().is_fulfilled());
/// ```
pub struct Promise<T, E> {
    shared: Arc<Shared<T, E>>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) cancel: Option<CancelContext<E>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Promise {
            shared: self.shared.clone(),
            executor: self.executor.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// The producer capability for a pending promise.
///
/// Cloneable so a producer can hand settlement rights to several racing
/// sources; only the first settlement wins, the rest are ignored.
pub struct Resolver<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Resolver {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> Promise<T, E> {
    /// The current state. Settled promises never change state again.
    pub fn state(&self) -> PromiseState {
        match &*self.shared.state.lock() {
            State::Pending { .. } => PromiseState::Pending,
            State::Settled(settlement) => PromiseState::of(settlement),
        }
    }

    /// The executor continuations default to.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Rebinds the default executor for this handle and every stage
    /// chained from it.
    pub fn on_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a pending promise, handing back the consumer handle and
    /// the producer capability.
    pub fn pending(executor: Arc<dyn Executor>) -> (Self, Resolver<T, E>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending {
                observers: Vec::new(),
            }),
        });
        let promise = Promise {
            shared: shared.clone(),
            executor,
            cancel: None,
        };
        (promise, Resolver { shared })
    }

    /// A promise that is already fulfilled with `value`.
    ///
    /// Observers still fire asynchronously through the executor.
    pub fn resolved(executor: Arc<dyn Executor>, value: T) -> Self {
        let (promise, resolver) = Self::pending(executor);
        resolver.resolve(value);
        promise
    }

    /// A promise that is already rejected with `error`.
    pub fn rejected(executor: Arc<dyn Executor>, error: E) -> Self {
        let (promise, resolver) = Self::pending(executor);
        resolver.reject(error);
        promise
    }

    /// Schedules `work` on the executor and returns the promise it will
    /// settle through the resolver it receives.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use executor::SerialExecutor;
    /// use promise_runtime::Promise;
    ///
    /// let serial = Arc::new(SerialExecutor::new());
    /// let promise = Promise::<String, String>::with(serial.clone(), |resolver| {
    ///     resolver.resolve("produced".to_string());
    /// });
    /// serial.run_until_idle();
    /// assert!(promise.state().is_fulfilled());
    /// ```
    pub fn with<F>(executor: Arc<dyn Executor>, work: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        let (promise, resolver) = Self::pending(executor.clone());
        executor.schedule(Box::new(move || work(resolver)));
        promise
    }

    /// Registers a continuation receiving the settlement, dispatched on
    /// this promise's default executor.
    ///
    /// Runs exactly once, after settlement, never inline during
    /// registration — even when the promise has already settled.
    pub fn observe<F>(&self, f: F)
    where
        F: FnOnce(Settlement<T, E>) + Send + 'static,
    {
        self.observe_on(self.executor.clone(), f);
    }

    /// Like [`observe`](Promise::observe), on an explicit executor.
    pub fn observe_on<F>(&self, executor: Arc<dyn Executor>, f: F)
    where
        F: FnOnce(Settlement<T, E>) + Send + 'static,
    {
        self.subscribe(executor, Box::new(f));
    }

    /// The registration primitive every combinator builds on.
    pub(crate) fn subscribe(&self, executor: Arc<dyn Executor>, callback: Callback<T, E>) {
        self.shared.register(Observer { executor, callback });
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Fulfills the promise. Ignored when already settled.
    pub fn resolve(&self, value: T) {
        self.shared.settle(Ok(value));
    }

    /// Rejects the promise. Ignored when already settled.
    pub fn reject(&self, error: E) {
        self.shared.settle(Err(error));
    }

    /// Settles the promise with an existing outcome. Ignored when
    /// already settled.
    pub fn settle(&self, settlement: Settlement<T, E>) {
        self.shared.settle(settlement);
    }

    /// Forwards `inner`'s eventual settlement to this resolver.
    ///
    /// This is the flattening primitive: a stage that produces another
    /// promise adopts its outcome instead of fulfilling with a
    /// promise-of-a-promise.
    pub fn adopt(&self, inner: Promise<T, E>) {
        let resolver = self.clone();
        let executor = inner.executor.clone();
        inner.subscribe(
            executor,
            Box::new(move |settlement| resolver.settle(settlement)),
        );
    }
}

impl<T, E> std::fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise").field("state", &self.state()).finish()
    }
}

impl<T, E> std::fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let settled = matches!(&*self.shared.state.lock(), State::Settled(_));
        f.debug_struct("Resolver").field("settled", &settled).finish()
    }
}
