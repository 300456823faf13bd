//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: an async, zero-argument handler
//! fired once when its delay elapses. The common handle type is
//! [`TaskRef`](crate::TaskRef), an `Arc<dyn Task>` suitable for sharing
//! across the runtime.
//!
//! There is no per-task cancellation: once registered, a task either fires
//! when its slot comes due or is abandoned by a wheel-wide quit.

use async_trait::async_trait;

use crate::error::TaskError;

/// # Asynchronous one-shot unit of work.
///
/// A `Task` has a single async [`run`](Task::run) method invoked by an
/// execution unit when the task's entry comes due. It fires at most once;
/// a failure is reported on the wheel's error stream, never retried.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tickwheel::{Task, TaskError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     async fn run(&self) -> Result<(), TaskError> {
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the task.
    ///
    /// Runs on a spawned execution unit; it never blocks the dispatch loop
    /// or other tasks due in the same tick.
    async fn run(&self) -> Result<(), TaskError>;
}
