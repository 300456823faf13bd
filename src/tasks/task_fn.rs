//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! invocation. This avoids shared mutable state; if a handler needs shared
//! state, capture an `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use tickwheel::{TaskFn, TaskRef, TaskError};
//!
//! let t: TaskRef = TaskFn::arc(|| async {
//!     // do work...
//!     Ok::<_, TaskError>(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// Function-backed task implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the task and returns it as a shared handle (`Arc<dyn Task>`).
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn run(&self) -> Result<(), TaskError> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_task_fn_runs_closure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = hits.clone();
        let t: TaskRef = TaskFn::arc(move || {
            let counted = counted.clone();
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TaskError>(())
            }
        });

        t.run().await.unwrap();
        t.run().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_task_fn_propagates_failure() {
        let t: TaskRef = TaskFn::arc(|| async { Err::<(), _>(TaskError::fail("boom")) });
        let err = t.run().await.unwrap_err();
        assert_eq!(err.as_label(), "task_failed");
    }
}
