//! Settlement outcomes and observable promise state.

/// The immutable outcome of a settled promise: the fulfillment value or
/// the rejection error.
pub type Settlement<T, E> = Result<T, E>;

/// The observable state of a promise.
///
/// Promises start `Pending` and transition at most once to `Fulfilled`
/// or `Rejected`; once settled the state never changes again.
///
/// # Examples
///
/// ```
/// use core_types::PromiseState;
///
/// let state = PromiseState::Pending;
/// assert!(state.is_pending());
/// assert!(!state.is_settled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with an error.
    Rejected,
}

impl PromiseState {
    /// True while the promise has not settled.
    pub fn is_pending(&self) -> bool {
        matches!(self, PromiseState::Pending)
    }

    /// True once the promise fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, PromiseState::Fulfilled)
    }

    /// True once the promise rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, PromiseState::Rejected)
    }

    /// True once the promise settled either way.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// The state a given settlement corresponds to.
    pub fn of<T, E>(settlement: &Settlement<T, E>) -> Self {
        match settlement {
            Ok(_) => PromiseState::Fulfilled,
            Err(_) => PromiseState::Rejected,
        }
    }
}
