//! Delay placement.
//!
//! Maps a registration delay to a ring position. The math is pivot-relative:
//! the delay is measured from the slot currently under the cursor, so a task
//! registered "2 steps from now" lands 2 slots ahead of wherever the cursor
//! is, not 2 slots from the ring's absolute zero.
//!
//! ```text
//! steps  = ceil(delay / step)    (min 1)
//! slot   = (pivot + steps) % slot_count
//! cycles = (steps - 1) / slot_count
//! ```
//!
//! `cycles` counts the full ring traversals the cursor makes before the entry
//! is eligible. The `steps - 1` keeps delays that are an exact multiple of
//! the cycle duration from waiting one extra traversal: `steps == slot_count`
//! maps back to the pivot slot, which the cursor next reaches after exactly
//! `slot_count` ticks — already the full delay.

use std::time::Duration;

/// Computed ring position for one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Target slot index, `0 <= slot < slot_count`.
    pub slot: usize,
    /// Full ring traversals to skip before firing.
    pub cycles: u64,
}

/// Maps `delay` to a slot and cycle count, relative to the current pivot.
///
/// Fractional-step delays round up to the next whole step, so an entry is
/// never placed in the slot currently being processed and fires no earlier
/// than its delay.
pub(crate) fn place(
    delay: Duration,
    step: Duration,
    slot_count: usize,
    pivot: usize,
) -> Placement {
    let steps = (delay.as_nanos().div_ceil(step.as_nanos()) as u64).max(1);
    let count = slot_count as u64;
    Placement {
        slot: ((pivot as u64 + steps) % count) as usize,
        cycles: (steps - 1) / count,
    }
}
