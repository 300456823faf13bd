//! Wheel configuration.
//!
//! Provides [`WheelConfig`], the centralized settings for a timing wheel.
//!
//! ## Sentinel values
//! - `slot_count = 0` → default ring size (3600 slots)
//! - `step` below the 1ms timer resolution → clamped to 1ms
//! - `error_capacity = 0` → default sink size (1024)
//! - `max_concurrent = 0` → unlimited (no semaphore created)
//!
//! Prefer the helper accessors over reading fields directly; they fold the
//! sentinel handling into one place.

use std::time::Duration;

/// Default number of ring slots.
pub const DEFAULT_SLOT_COUNT: usize = 3600;

/// Minimum tick period; the tokio timer has millisecond granularity.
pub const MIN_STEP: Duration = Duration::from_millis(1);

/// Default bound of the error sink.
pub const DEFAULT_ERROR_CAPACITY: usize = 1024;

/// What the error sink does when it is full and a new failure arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Producers wait until the consumer drains the stream.
    ///
    /// This is the classic contract: the wheel's owner **must** keep reading
    /// the error stream, otherwise execution units reporting failures will
    /// suspend indefinitely.
    #[default]
    Block,

    /// Drop the newest failure and count it.
    ///
    /// Execution units never suspend; dropped failures are tallied in
    /// [`ErrorStream::dropped`](crate::ErrorStream::dropped) and logged at
    /// warn level.
    DropNewest,
}

/// Configuration for a [`TimeWheel`](crate::TimeWheel).
///
/// Defines:
/// - **Ring geometry**: slot count and tick period
/// - **Error delivery**: sink capacity and overflow policy
/// - **Fan-out bound**: max concurrently running handlers
///
/// ## Field semantics
/// - `name`: label returned by `info()`, free-form
/// - `slot_count`: ring positions (`0` = 3600)
/// - `step`: tick period; one slot is processed per tick (clamped to 1ms)
/// - `error_capacity`: bound of the error stream (`0` = 1024)
/// - `max_concurrent`: handler concurrency limit (`0` = unlimited)
/// - `overflow`: sink behavior when full
#[derive(Clone, Debug)]
pub struct WheelConfig {
    /// Human-readable wheel name.
    pub name: String,

    /// Number of slots in the ring.
    ///
    /// `0` falls back to [`DEFAULT_SLOT_COUNT`]. Together with `step` this
    /// determines the cycle duration (`step × slot_count`), the longest delay
    /// representable without cycle counting.
    pub slot_count: usize,

    /// Tick period of the dispatch loop.
    ///
    /// Values below [`MIN_STEP`] are clamped; delays are measured in whole
    /// steps, so this is also the scheduling resolution.
    pub step: Duration,

    /// Capacity of the bounded error stream.
    ///
    /// `0` falls back to [`DEFAULT_ERROR_CAPACITY`].
    pub error_capacity: usize,

    /// Maximum number of handlers running at once.
    ///
    /// - `0` = unlimited (one spawned unit per due entry, no gate)
    /// - `n > 0` = at most `n` handlers execute simultaneously
    pub max_concurrent: usize,

    /// Overflow behavior of the error sink.
    pub overflow: OverflowPolicy,
}

impl WheelConfig {
    /// Creates a config with the given name and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the slot count with the zero sentinel resolved.
    #[inline]
    pub fn slot_count_or_default(&self) -> usize {
        if self.slot_count == 0 {
            DEFAULT_SLOT_COUNT
        } else {
            self.slot_count
        }
    }

    /// Returns the tick period clamped to the minimum resolution.
    #[inline]
    pub fn step_clamped(&self) -> Duration {
        self.step.max(MIN_STEP)
    }

    /// Returns the error-sink capacity with the zero sentinel resolved.
    #[inline]
    pub fn error_capacity_or_default(&self) -> usize {
        if self.error_capacity == 0 {
            DEFAULT_ERROR_CAPACITY
        } else {
            self.error_capacity
        }
    }

    /// Returns the handler concurrency limit as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` concurrent handlers
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.max_concurrent == 0 {
            None
        } else {
            Some(self.max_concurrent)
        }
    }
}

impl Default for WheelConfig {
    /// Default configuration:
    ///
    /// - `slot_count = 3600`
    /// - `step = 1s` (one-hour cycle with the default ring)
    /// - `error_capacity = 1024`
    /// - `max_concurrent = 0` (unlimited)
    /// - `overflow = Block`
    fn default() -> Self {
        Self {
            name: String::new(),
            slot_count: DEFAULT_SLOT_COUNT,
            step: Duration::from_secs(1),
            error_capacity: DEFAULT_ERROR_CAPACITY,
            max_concurrent: 0,
            overflow: OverflowPolicy::Block,
        }
    }
}
