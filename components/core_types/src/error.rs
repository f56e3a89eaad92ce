//! Error taxonomy for promise pipelines.
//!
//! Pipelines are generic over the producer's error type `E`. Some stages,
//! however, manufacture errors of their own: a timeout stage whose timer
//! wins the race, a stage skipped because its cancellation token tripped,
//! a retry loop that ran out of attempts. [`EngineError`] is the contract
//! such stages place on the error type, and [`PromiseError`] is the
//! canonical implementation used throughout the test suite and by callers
//! that do not need a custom taxonomy.

use std::fmt;

/// Implemented by error types that can represent failures the engine
/// itself produces.
///
/// Value-path combinators (`then`, `catch`, `all`, `race`) stay fully
/// generic and never require this trait; only `timeout`, cancellation
/// attachment, and the `retry` family do.
pub trait EngineError: Sized + Send + 'static {
    /// The error a timeout stage rejects with when its timer fires before
    /// the upstream promise settles.
    fn timed_out() -> Self;

    /// The error a stage rejects with when its cancellation token has
    /// tripped before the stage could run.
    fn cancelled() -> Self;

    /// The error reported after the final failed retry attempt.
    ///
    /// The default keeps the last attempt's error unchanged, so the
    /// downstream rejection carries exactly what the final attempt
    /// produced. Implementations may wrap it in a dedicated variant
    /// instead.
    fn retry_exhausted(last: Self) -> Self {
        last
    }
}

/// Canonical pipeline error: a producer-supplied failure or one of the
/// failure kinds the engine manufactures itself.
///
/// # Examples
///
/// ```
/// use core_types::PromiseError;
///
/// let err: PromiseError<String> = PromiseError::user("boom".to_string());
/// assert_eq!(err.last_user_error(), Some(&"boom".to_string()));
/// assert!(!err.is_timeout());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromiseError<E> {
    /// Failure produced by a pipeline stage or by the producer.
    User(E),

    /// A timeout elapsed before the upstream promise settled.
    Timeout,

    /// The pipeline observed a cancelled token.
    Cancelled,

    /// Every retry attempt failed; wraps the last attempt's error.
    RetryExhausted(Box<PromiseError<E>>),
}

// `Display`/`Error` are implemented by hand rather than via `#[derive(Error)]`:
// the recursive `RetryExhausted(Box<PromiseError<E>>)` field makes thiserror
// emit a self-referential `Box<PromiseError<E>>: Display` bound, which sends
// trait resolution into an overflow. The hand-written impl below keeps the
// exact same messages and the same (empty) `source()`.
impl<E: fmt::Display> fmt::Display for PromiseError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseError::User(e) => write!(f, "{}", e),
            PromiseError::Timeout => f.write_str("timed out waiting for settlement"),
            PromiseError::Cancelled => f.write_str("pipeline cancelled"),
            PromiseError::RetryExhausted(inner) => {
                write!(f, "retry attempts exhausted: {}", inner)
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for PromiseError<E> {}

impl<E> PromiseError<E> {
    /// Wraps a producer-supplied error.
    pub fn user(error: E) -> Self {
        PromiseError::User(error)
    }

    /// Returns true for the timeout kind.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PromiseError::Timeout)
    }

    /// Returns true for the cancelled kind.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromiseError::Cancelled)
    }

    /// Returns true for the retry-exhausted kind.
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, PromiseError::RetryExhausted(_))
    }

    /// The innermost producer-supplied error, unwrapping any number of
    /// retry-exhausted layers. `None` for engine-made kinds with no user
    /// error inside.
    pub fn last_user_error(&self) -> Option<&E> {
        match self {
            PromiseError::User(e) => Some(e),
            PromiseError::RetryExhausted(inner) => inner.last_user_error(),
            PromiseError::Timeout | PromiseError::Cancelled => None,
        }
    }
}

impl<E> From<E> for PromiseError<E> {
    fn from(error: E) -> Self {
        PromiseError::User(error)
    }
}

impl<E: Send + 'static> EngineError for PromiseError<E> {
    fn timed_out() -> Self {
        PromiseError::Timeout
    }

    fn cancelled() -> Self {
        PromiseError::Cancelled
    }

    fn retry_exhausted(last: Self) -> Self {
        PromiseError::RetryExhausted(Box::new(last))
    }
}
