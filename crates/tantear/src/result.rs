//! Crate-wide result and error types.
//!
//! The polling and action layers keep their own error enums
//! ([`crate::wait::WaitError`], [`crate::action::ActionError`]); this module
//! folds them, together with collaborator failures, into the error type page
//! objects and scenarios work with. A wait timeout only becomes an error here,
//! when a caller decides the condition was required.

use std::time::Duration;
use thiserror::Error;

use crate::action::ActionError;
use crate::api::FetchError;
use crate::driver::DriverError;
use crate::wait::WaitError;

/// Result type for scenario-facing operations.
pub type TantearResult<T> = Result<T, TantearError>;

/// Errors surfaced to scenarios.
#[derive(Debug, Error)]
pub enum TantearError {
    /// A wait could not be evaluated or was cancelled.
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// A verified action failed in one of its phases.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The query-resolver collaborator failed, surfaced unchanged.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The HTTP fetch collaborator failed, surfaced unchanged.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A required condition did not become true within its budget.
    #[error("condition {description:?} not satisfied after {elapsed:?}")]
    ConditionTimeout {
        /// Human-readable description from the wait spec.
        description: String,
        /// Wall-clock time spent polling.
        elapsed: Duration,
    },

    /// A page's key element never showed up.
    #[error("{page} page did not load")]
    PageNotLoaded {
        /// Page name used for diagnostics.
        page: String,
    },

    /// A dropdown option was expected but never displayed.
    #[error("option {option:?} not found in the dropdown")]
    OptionNotFound {
        /// The visible text of the missing option.
        option: String,
    },

    /// Result-count text contained no digits to parse.
    #[error("could not parse a result count from {text:?}")]
    InvalidCount {
        /// The text that failed to parse.
        text: String,
    },
}
