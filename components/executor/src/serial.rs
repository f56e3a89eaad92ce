//! Single-threaded cooperative executor.
//!
//! The serial executor never spawns threads of its own. Work accumulates
//! in a FIFO ready queue (plus a due-time-ordered delayed queue) until
//! the owner drives it explicitly:
//!
//! 1. [`run_until_idle`](SerialExecutor::run_until_idle) drains the ready
//!    queue one item at a time, sleeps for pending timers, and returns
//!    when nothing is left.
//! 2. [`run_pending`](SerialExecutor::run_pending) drains only work that
//!    is already due and never sleeps, which makes test stepping
//!    deterministic.
//!
//! Work submitted while the executor is being driven joins the same FIFO
//! queue, so continuations enqueued by running work still execute in
//! submission order.

use crate::delay_queue::DelayQueue;
use crate::{Executor, Work};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

/// A cooperative executor driven by its owner.
///
/// # Examples
///
/// ```
/// use executor::{Executor, SerialExecutor};
///
/// let serial = SerialExecutor::new();
/// serial.schedule(Box::new(|| println!("ran")));
/// assert_eq!(serial.pending_work(), 1);
/// serial.run_until_idle();
/// assert_eq!(serial.pending_work(), 0);
/// ```
pub struct SerialExecutor {
    ready: Mutex<VecDeque<Work>>,
    delayed: Mutex<DelayQueue>,
}

impl Default for SerialExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialExecutor {
    /// Creates an executor with empty queues.
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(VecDeque::new()),
            delayed: Mutex::new(DelayQueue::new()),
        }
    }

    /// Runs queued work until both queues are empty.
    ///
    /// Sleeps when only delayed work remains, so a pipeline using timers
    /// completes without the caller polling.
    pub fn run_until_idle(&self) {
        loop {
            self.promote_due();
            let next = self.ready.lock().pop_front();
            if let Some(work) = next {
                work();
                continue;
            }
            match self.delayed.lock().next_due() {
                Some(due) => {
                    let now = Instant::now();
                    if due > now {
                        thread::sleep(due - now);
                    }
                }
                None => break,
            }
        }
    }

    /// Runs work that is ready right now and returns how many items ran.
    ///
    /// Never sleeps: delayed work that is not yet due stays queued. Work
    /// enqueued by the items being run is drained too, as long as it is
    /// immediately ready.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            self.promote_due();
            let next = self.ready.lock().pop_front();
            match next {
                Some(work) => {
                    work();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }

    /// Number of queued items, ready and delayed combined.
    pub fn pending_work(&self) -> usize {
        self.ready.lock().len() + self.delayed.lock().len()
    }

    /// True when both queues are empty.
    pub fn is_idle(&self) -> bool {
        self.pending_work() == 0
    }

    /// Moves delayed items whose due time has passed onto the ready queue.
    fn promote_due(&self) {
        let now = Instant::now();
        let mut delayed = self.delayed.lock();
        while let Some(work) = delayed.pop_due(now) {
            self.ready.lock().push_back(work);
        }
    }
}

impl Executor for SerialExecutor {
    fn schedule(&self, work: Work) {
        self.ready.lock().push_back(work);
    }

    fn schedule_after(&self, delay: Duration, work: Work) {
        self.delayed.lock().push(Instant::now() + delay, work);
    }
}

impl std::fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialExecutor")
            .field("ready", &self.ready.lock().len())
            .field("delayed", &self.delayed.lock().len())
            .finish()
    }
}
