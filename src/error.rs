//! Error types used by the timing wheel and by task handlers.
//!
//! This module defines three error enums:
//!
//! - [`WheelError`] — synchronous errors returned directly to the caller
//!   (bad registration input, lifecycle misuse, id-generation failure).
//! - [`TaskError`] — errors raised by individual task handlers.
//! - [`ExecError`] — execution-time failures delivered asynchronously through
//!   the wheel's error stream, never to the caller of `add_task`.
//!
//! All types provide an `as_label` helper for logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::core::WheelState;
use crate::id::IdError;

/// # Errors returned synchronously by wheel operations.
///
/// These represent misuse of the wheel API or a failure of the id-generation
/// collaborator. Execution-time failures never appear here; see [`ExecError`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WheelError {
    /// A lifecycle operation was invoked outside its required state.
    #[error("cannot {op} while wheel is {state:?}")]
    InvalidState {
        /// The operation that was attempted (`"run"`, `"quit"`, ...).
        op: &'static str,
        /// The wheel state at the time of the call.
        state: WheelState,
    },

    /// Registration was attempted with a non-positive delay.
    #[error("delay must be positive, got {delay:?}")]
    InvalidDelay {
        /// The rejected delay value.
        delay: Duration,
    },

    /// The id-generation collaborator failed; no task was registered.
    #[error("id generation failed: {source}")]
    IdGeneration {
        #[from]
        source: IdError,
    },
}

impl WheelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use tickwheel::WheelError;
    ///
    /// let err = WheelError::InvalidDelay { delay: Duration::ZERO };
    /// assert_eq!(err.as_label(), "invalid_delay");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WheelError::InvalidState { .. } => "invalid_state",
            WheelError::InvalidDelay { .. } => "invalid_delay",
            WheelError::IdGeneration { .. } => "id_generation",
        }
    }
}

/// # Errors produced by task handlers.
///
/// A handler is user code; this type carries its failure message back through
/// the wheel. Handlers fire at most once — there is no retry, so no
/// retryable/fatal distinction is needed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Handler execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Wraps an arbitrary error message.
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
        }
    }
}

/// # Execution-time failures, delivered via the error stream.
///
/// Produced by the execution units the dispatcher spawns for due tasks.
/// They are never returned to the caller that registered the task; the
/// wheel's owner observes them by draining [`ErrorStream`](crate::ErrorStream).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ExecError {
    /// An entry came due but its handler was missing from the task store.
    ///
    /// Indicates an internal bookkeeping inconsistency; the dispatch loop
    /// keeps running and the entry is still accounted for exactly once.
    #[error("task {id} not found")]
    TaskNotFound {
        /// Id of the orphaned entry.
        id: String,
    },

    /// A handler ran and returned a failure.
    #[error("task {id} failed: {error}")]
    Handler {
        /// Id of the fired task.
        id: String,
        /// The handler's error.
        error: TaskError,
    },
}

impl ExecError {
    /// Returns the id of the task this failure belongs to.
    pub fn task_id(&self) -> &str {
        match self {
            ExecError::TaskNotFound { id } => id,
            ExecError::Handler { id, .. } => id,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecError::TaskNotFound { .. } => "task_not_found",
            ExecError::Handler { .. } => "handler_error",
        }
    }
}
