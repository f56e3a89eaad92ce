//! Execution contexts for the promise engine.
//!
//! This crate decides *where* continuations run. The engine itself only
//! ever talks to the [`Executor`] trait; callers pick (and own) a
//! concrete implementation:
//!
//! - [`SerialExecutor`] - Single-threaded, cooperative, driven explicitly
//!   by its owner; deterministic ordering for tests and event-loop-style
//!   embedding
//! - [`ThreadPoolExecutor`] - Worker threads over a FIFO channel with a
//!   dedicated timer thread; sized by [`PoolConfig`]
//! - [`TimerThread`] - The standalone delayed-work thread the pool builds
//!   on
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use executor::{Executor, SerialExecutor};
//!
//! let serial = Arc::new(SerialExecutor::new());
//! let executor: Arc<dyn Executor> = serial.clone();
//! executor.schedule(Box::new(|| println!("hello")));
//! serial.run_until_idle();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod delay_queue;
mod executor;
mod pool;
mod serial;
mod timer;

pub use executor::{Executor, Work};
pub use pool::{PoolConfig, ThreadPoolExecutor};
pub use serial::SerialExecutor;
pub use timer::TimerThread;
