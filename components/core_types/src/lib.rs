//! Core types for the promise execution engine.
//!
//! This crate provides the shared vocabulary used by every other
//! component: settlement outcomes, observable promise state, and the
//! error taxonomy for failures the engine manufactures itself.
//!
//! # Overview
//!
//! - [`Settlement`] - The outcome of a settled promise
//! - [`PromiseState`] - Pending / Fulfilled / Rejected
//! - [`EngineError`] - Contract for error types the engine can construct
//! - [`PromiseError`] - Canonical error taxonomy
//!
//! # Examples
//!
//! ```
//! use core_types::{EngineError, PromiseError, PromiseState};
//!
//! // Engine-made failure kinds
//! let timeout: PromiseError<String> = PromiseError::timed_out();
//! assert!(timeout.is_timeout());
//!
//! // Producer failures wrap transparently
//! let user: PromiseError<String> = "disk full".to_string().into();
//! assert_eq!(user.last_user_error().map(String::as_str), Some("disk full"));
//!
//! let state = PromiseState::Pending;
//! assert!(state.is_pending());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod settlement;

pub use error::{EngineError, PromiseError};
pub use settlement::{PromiseState, Settlement};
