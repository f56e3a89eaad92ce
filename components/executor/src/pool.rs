//! Multi-threaded worker-pool executor.
//!
//! Workers pull from a shared FIFO channel, so dispatch order always
//! matches submission order; with more than one worker, execution of
//! dispatched items may overlap. Delayed work goes through a dedicated
//! timer thread that forwards each item into the same channel at its due
//! time.
//!
//! Dropping the pool is a clean shutdown: the timer stops, the channel
//! closes, workers drain what was already queued and exit, and every
//! thread is joined.

use crate::timer::TimerThread;
use crate::{Executor, Work};
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sizing configuration for [`ThreadPoolExecutor`].
///
/// Serde-derived so deployments can load it from configuration files.
///
/// # Examples
///
/// ```
/// use executor::PoolConfig;
///
/// let config: PoolConfig = serde_json::from_str(r#"{ "workers": 2 }"#).unwrap();
/// assert_eq!(config.workers, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads. Zero is treated as one.
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(4, |n| n.get()),
        }
    }
}

/// A worker-pool executor.
///
/// # Examples
///
/// ```
/// use executor::{Executor, PoolConfig, ThreadPoolExecutor};
///
/// let pool = ThreadPoolExecutor::new(PoolConfig { workers: 2 });
/// let (sender, receiver) = crossbeam::channel::bounded(1);
/// pool.schedule(Box::new(move || sender.send(41 + 1).unwrap()));
/// assert_eq!(receiver.recv().unwrap(), 42);
/// ```
pub struct ThreadPoolExecutor {
    sender: Option<Sender<Work>>,
    workers: Vec<JoinHandle<()>>,
    timer: TimerThread,
}

impl ThreadPoolExecutor {
    /// Spawns the configured number of workers plus the timer thread.
    pub fn new(config: PoolConfig) -> Self {
        let (sender, receiver) = channel::unbounded::<Work>();
        let workers = (0..config.workers.max(1))
            .map(|_| {
                let receiver = receiver.clone();
                thread::spawn(move || worker_loop(receiver))
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
            timer: TimerThread::spawn(),
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

impl Default for ThreadPoolExecutor {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

fn worker_loop(receiver: Receiver<Work>) {
    // Exits when the channel is both empty and disconnected, which drains
    // work queued before shutdown.
    while let Ok(work) = receiver.recv() {
        work();
    }
}

impl Executor for ThreadPoolExecutor {
    fn schedule(&self, work: Work) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(work);
        }
    }

    fn schedule_after(&self, delay: Duration, work: Work) {
        if let Some(sender) = &self.sender {
            let sender = sender.clone();
            self.timer.schedule(
                delay,
                Box::new(move || {
                    let _ = sender.send(work);
                }),
            );
        }
    }
}

impl Drop for ThreadPoolExecutor {
    fn drop(&mut self) {
        // The timer holds channel senders inside queued entries; it must
        // stop first or the workers would never see a disconnect.
        self.timer.shutdown();
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for ThreadPoolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPoolExecutor")
            .field("workers", &self.workers.len())
            .finish()
    }
}
