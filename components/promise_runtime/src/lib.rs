//! Promise execution engine.
//!
//! This crate is the engine behind the convenience layers: the promise
//! state machine, the chaining/combinator algebra, and cooperative
//! cancellation. Where continuations run is delegated entirely to the
//! [`executor`] crate — the engine never blocks a thread and never
//! assumes a concurrency model.
//!
//! # Overview
//!
//! - [`Promise`] / [`Resolver`] - Consumer handle and producer capability
//!   for an at-most-once settled value
//! - Chaining: [`then`](Promise::then), [`try_then`](Promise::try_then),
//!   [`and_then`](Promise::and_then), [`catch`](Promise::catch),
//!   [`recover`](Promise::recover), [`always`](Promise::always)
//! - Grouping: [`all`](Promise::all), [`race`](Promise::race)
//! - Timing: [`timeout`](Promise::timeout), [`delay`](Promise::delay),
//!   the [`retry`](Promise::retry) family with [`RetryPolicy`]
//! - [`CancellationToken`] - Cooperative short-circuit for whole chains
//! - Boundary helpers: [`sync`] (blocking waits) and
//!   [`PromiseFuture`] (`std` future bridge)
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use executor::{PoolConfig, ThreadPoolExecutor};
//! use promise_runtime::{sync, Promise};
//!
//! let pool = Arc::new(ThreadPoolExecutor::new(PoolConfig { workers: 2 }));
//! let (promise, resolver) = Promise::<u32, String>::pending(pool);
//!
//! let pipeline = promise
//!     .then(|n| n + 1)
//!     .then(|n| n * 10)
//!     .catch(|_error| 0);
//!
//! resolver.resolve(3);
//! assert_eq!(sync::wait(&pipeline), Some(Ok(40)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod cancel;
mod chain;
mod future;
mod group;
mod promise;
mod retry;
pub mod sync;
mod timing;

pub use cancel::CancellationToken;
pub use future::PromiseFuture;
pub use promise::{Promise, Resolver};
pub use retry::RetryPolicy;
