//! Slot ring: the fixed array of per-slot entry lists.
//!
//! Each slot guards its entries with its own lock; registration and dispatch
//! contend only when they touch the same slot. No lock is ever held across
//! an `.await` that isn't the lock acquisition itself.

use tokio::sync::Mutex;

/// One scheduled placement, owned by exactly one slot.
#[derive(Debug)]
pub(crate) struct TaskEntry {
    /// Task id; the handler lives in the task store under this key.
    pub id: String,
    /// Remaining full ring traversals before the entry is due.
    ///
    /// Decremented by the dispatcher each time the cursor passes this slot
    /// without firing it; fires at zero. Only mutated under the slot lock.
    pub cycles: u64,
}

/// A single ring position.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    entries: Mutex<Vec<TaskEntry>>,
}

impl Slot {
    /// Appends an entry, preserving insertion order.
    pub async fn push(&self, entry: TaskEntry) {
        self.entries.lock().await.push(entry);
    }

    /// Splits off the due entries and ages the rest.
    ///
    /// Entries with `cycles == 0` are removed and returned for execution;
    /// the remainder have their cycle count decremented in place, keeping
    /// insertion order. Removing due entries here (rather than after their
    /// handler completes) guarantees each entry fires at most once even if
    /// its handler outlives a full ring traversal.
    pub async fn take_due(&self) -> Vec<TaskEntry> {
        let mut entries = self.entries.lock().await;
        let (due, mut rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut *entries).into_iter().partition(|e| e.cycles == 0);
        for entry in &mut rest {
            entry.cycles -= 1;
        }
        *entries = rest;
        due
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Fixed-size array of slots.
#[derive(Debug)]
pub(crate) struct SlotRing {
    slots: Vec<Slot>,
}

impl SlotRing {
    /// Creates a ring with `slot_count` empty slots.
    pub fn new(slot_count: usize) -> Self {
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, Slot::default);
        Self { slots }
    }

    /// Returns the slot at `index`.
    ///
    /// Callers only produce indices already reduced modulo the slot count.
    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// Number of slots in the ring.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
