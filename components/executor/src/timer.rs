//! Background timer thread for delayed work.
//!
//! A single thread sleeps on a due-time-ordered queue and invokes each
//! item when its deadline passes. Items run on the timer thread itself,
//! so they must stay short; the worker pool uses them only to forward
//! the real work into its own queue.

use crate::delay_queue::DelayQueue;
use crate::Work;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct TimerShared {
    queue: Mutex<DelayQueue>,
    wakeup: Condvar,
    shutdown: AtomicBool,
}

/// A dedicated thread that fires delayed work at its due time.
pub struct TimerThread {
    shared: Arc<TimerShared>,
    handle: Option<JoinHandle<()>>,
}

impl TimerThread {
    /// Spawns the timer thread with an empty queue.
    pub fn spawn() -> Self {
        let shared = Arc::new(TimerShared {
            queue: Mutex::new(DelayQueue::new()),
            wakeup: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });
        let thread_shared = shared.clone();
        let handle = thread::spawn(move || timer_loop(thread_shared));
        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Enqueues `work` to fire once `delay` has elapsed.
    pub fn schedule(&self, delay: Duration, work: Work) {
        {
            let mut queue = self.shared.queue.lock();
            queue.push(Instant::now() + delay, work);
        }
        self.wakeup();
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Stops the thread and discards timers that have not fired.
    ///
    /// Called automatically on drop; idempotent.
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.wakeup();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.shared.queue.lock().clear();
    }

    fn wakeup(&self) {
        // Guard the notify with the queue lock so the timer thread cannot
        // miss a signal between its due-check and its wait.
        let _queue = self.shared.queue.lock();
        self.shared.wakeup.notify_all();
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TimerThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerThread")
            .field("pending", &self.pending())
            .finish()
    }
}

fn timer_loop(shared: Arc<TimerShared>) {
    let mut queue = shared.queue.lock();
    loop {
        if shared.shutdown.load(Ordering::SeqCst) {
            return;
        }

        // Collect everything already due, then run it outside the lock so
        // new timers can be scheduled while items fire.
        let mut due = Vec::new();
        let now = Instant::now();
        while let Some(work) = queue.pop_due(now) {
            due.push(work);
        }
        if !due.is_empty() {
            drop(queue);
            for work in due {
                work();
            }
            queue = shared.queue.lock();
            continue;
        }

        match queue.next_due() {
            Some(deadline) => {
                let _ = shared.wakeup.wait_until(&mut queue, deadline);
            }
            None => shared.wakeup.wait(&mut queue),
        }
    }
}
