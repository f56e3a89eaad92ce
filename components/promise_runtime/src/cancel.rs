//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a shared monotonic flag. Cancelling never
//! interrupts work that is already running; it short-circuits future
//! stages: every combinator checks the chain's token before running a
//! stage body and rejects with the cancelled error kind instead.

use core_types::EngineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag observed cooperatively by pipeline stages.
///
/// # Examples
///
/// ```
/// use promise_runtime::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// token.cancel(); // idempotent
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, active token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token. Idempotent and monotonic — a cancelled token
    /// never becomes active again.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Chain context carried by a promise handle: the token plus the error
/// constructor captured when the token was attached (so fully generic
/// combinators can manufacture the cancelled error without a bound).
pub(crate) struct CancelContext<E> {
    token: CancellationToken,
    make_cancelled: fn() -> E,
}

impl<E> Clone for CancelContext<E> {
    fn clone(&self) -> Self {
        CancelContext {
            token: self.token.clone(),
            make_cancelled: self.make_cancelled,
        }
    }
}

impl<E> CancelContext<E> {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn cancelled_error(&self) -> E {
        (self.make_cancelled)()
    }
}

impl<T, E> crate::Promise<T, E>
where
    T: Clone + Send + 'static,
    E: EngineError + Clone + Send + 'static,
{
    /// Threads `token` through this handle and every stage chained from
    /// it. Once the token trips, later stages stop running their bodies
    /// and their promises reject with [`EngineError::cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(CancelContext {
            token,
            make_cancelled: E::cancelled,
        });
        self
    }
}
