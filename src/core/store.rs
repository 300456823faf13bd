//! Task store: id → handler mapping.
//!
//! Independent of the ring. Registration inserts here before the entry goes
//! into its slot; execution units remove the handler when the entry fires.
//! No ordering guarantees across keys.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::tasks::TaskRef;

/// Concurrent map from task id to its handler.
#[derive(Default)]
pub(crate) struct TaskStore {
    tasks: RwLock<HashMap<String, TaskRef>>,
}

impl TaskStore {
    /// Stores a handler under `id`, replacing any previous one.
    pub async fn insert(&self, id: String, task: TaskRef) {
        self.tasks.write().await.insert(id, task);
    }

    /// Removes and returns the handler for `id`, if present.
    ///
    /// The firing path uses this for lookup and cleanup in one step: a due
    /// entry claims its handler exactly once.
    pub async fn remove(&self, id: &str) -> Option<TaskRef> {
        self.tasks.write().await.remove(id)
    }
}
