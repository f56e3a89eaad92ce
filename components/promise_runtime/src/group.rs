//! Multi-upstream combinators: `all` and `race`.

use executor::Executor;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::promise::Promise;

/// Book-keeping for an in-flight `all`.
struct AllState<T> {
    results: Vec<Option<T>>,
    remaining: usize,
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Fulfills with every input's value, in input order, once all of
    /// them have fulfilled — regardless of completion order. Rejects
    /// with the first rejection without waiting for the rest; their
    /// later settlements are ignored here (the inputs themselves still
    /// settle independently).
    ///
    /// An empty input fulfills immediately with an empty vector.
    pub fn all(executor: Arc<dyn Executor>, promises: Vec<Promise<T, E>>) -> Promise<Vec<T>, E> {
        let (downstream, resolver) = Promise::pending(executor.clone());
        if promises.is_empty() {
            resolver.resolve(Vec::new());
            return downstream;
        }

        let state = Arc::new(Mutex::new(AllState {
            results: (0..promises.len()).map(|_| None).collect(),
            remaining: promises.len(),
        }));

        for (index, promise) in promises.iter().enumerate() {
            let state = state.clone();
            let resolver = resolver.clone();
            promise.subscribe(
                executor.clone(),
                Box::new(move |settlement| match settlement {
                    Ok(value) => {
                        let completed = {
                            let mut state = state.lock();
                            state.results[index] = Some(value);
                            state.remaining -= 1;
                            if state.remaining == 0 {
                                Some(state.results.drain(..).flatten().collect::<Vec<T>>())
                            } else {
                                None
                            }
                        };
                        if let Some(values) = completed {
                            resolver.resolve(values);
                        }
                    }
                    // First rejection wins; the resolver ignores the rest.
                    Err(error) => resolver.reject(error),
                }),
            );
        }
        downstream
    }

    /// Settles with whichever input settles first; later settlements are
    /// ignored.
    ///
    /// An empty race never settles.
    pub fn race(executor: Arc<dyn Executor>, promises: Vec<Promise<T, E>>) -> Promise<T, E> {
        let (downstream, resolver) = Promise::pending(executor.clone());
        for promise in &promises {
            let resolver = resolver.clone();
            promise.subscribe(
                executor.clone(),
                Box::new(move |settlement| resolver.settle(settlement)),
            );
        }
        downstream
    }
}
