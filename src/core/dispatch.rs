//! Dispatch loop: advances the cursor and fires due slots.
//!
//! One loop runs per wheel, spawned exactly once by
//! [`TimeWheel::run`](crate::TimeWheel::run). It suspends only on the
//! periodic timer and the quit signal, never on task execution.
//!
//! ```text
//! every step:
//!   pivot = (pivot + 1) % slot_count
//!   take_due(slots[pivot])
//!     ├─ cycles == 0 → spawn execution unit  (remove handler, run, report)
//!     └─ cycles  > 0 → cycles -= 1           (in place, under the slot lock)
//!
//! quit signal → state = Stopped, loop exits; pending entries are abandoned
//! ```
//!
//! Each due entry becomes its own spawned unit so a slow handler delays
//! neither the tick nor its slot-mates. When the wheel has a concurrency
//! limit, units queue on the shared semaphore before running their handler.

use std::sync::Arc;

use log::debug;
use tokio::time;

use crate::core::ring::TaskEntry;
use crate::core::wheel::Inner;
use crate::error::ExecError;

/// Drives the wheel until the quit token fires.
pub(crate) async fn run_loop(inner: Arc<Inner>) {
    let mut ticker = time::interval(inner.step);
    // An interval's first tick completes immediately; consume it so the
    // pivot first advances one full step after start.
    ticker.tick().await;

    debug!(
        "wheel {:?}: dispatch loop started, {} slots x {:?}",
        inner.name,
        inner.ring.len(),
        inner.step,
    );

    loop {
        tokio::select! {
            _ = inner.quit.cancelled() => break,
            _ = ticker.tick() => {
                let pivot = inner.advance_pivot();
                process_slot(&inner, pivot).await;
            }
        }
    }

    inner.set_stopped();
    debug!("wheel {:?}: dispatch loop stopped", inner.name);
}

/// Processes one slot: fires due entries, ages the rest.
async fn process_slot(inner: &Arc<Inner>, pivot: usize) {
    let due = inner.ring.slot(pivot).take_due().await;
    if due.is_empty() {
        return;
    }
    debug!(
        "wheel {:?}: slot {} firing {} entries",
        inner.name,
        pivot,
        due.len()
    );
    for entry in due {
        tokio::spawn(fire(inner.clone(), entry));
    }
}

/// Execution unit for one due entry.
///
/// Claims the handler from the store, runs it, reports any failure to the
/// error sink, and settles the capacity count exactly once.
async fn fire(inner: Arc<Inner>, entry: TaskEntry) {
    let _permit = match &inner.semaphore {
        Some(sem) => sem.clone().acquire_owned().await.ok(),
        None => None,
    };

    match inner.store.remove(&entry.id).await {
        None => {
            inner
                .sink
                .report(ExecError::TaskNotFound { id: entry.id })
                .await;
        }
        Some(task) => {
            if let Err(error) = task.run().await {
                inner
                    .sink
                    .report(ExecError::Handler {
                        id: entry.id,
                        error,
                    })
                    .await;
            }
        }
    }

    inner.settle_capacity().await;
}
