//! The wheel aggregate: construction, registration, lifecycle, introspection.
//!
//! [`TimeWheel`] owns the slot ring, task store, error sink, capacity count,
//! and the lifecycle state machine. The dispatch loop itself lives in
//! [`dispatch`](super::dispatch); this module gates when it starts and stops.
//!
//! ## Lifecycle
//! ```text
//!          run()                quit() / drain
//!  Init ──────────► Running ──────────────────► Stopped (terminal)
//! ```
//! - `run` transitions `Init → Running` with a compare-and-swap, so the loop
//!   is spawned at most once per wheel.
//! - `quit` cancels the quit token; pending entries are abandoned unfired.
//!   The token is idempotent, so repeated quits after the first are no-ops.
//! - `blocking_quit` starts a watcher that cancels the token only once the
//!   capacity count drains to zero: every registered task fires (or is
//!   reported not-found) before the wheel stops.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use log::{debug, error};
use tokio::sync::{RwLock, Semaphore};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::WheelConfig;
use crate::core::dispatch;
use crate::core::placement::place;
use crate::core::ring::{SlotRing, TaskEntry};
use crate::core::sink::{ErrorSink, ErrorStream};
use crate::core::store::TaskStore;
use crate::error::WheelError;
use crate::id::{IdProvider, UlidProvider};
use crate::tasks::TaskRef;

/// Lifecycle state of a wheel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelState {
    /// Created, dispatch loop not yet started.
    Init = 0,
    /// Dispatch loop is ticking.
    Running = 1,
    /// Dispatch loop has exited. Terminal.
    Stopped = 2,
}

impl WheelState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WheelState::Init,
            1 => WheelState::Running,
            _ => WheelState::Stopped,
        }
    }
}

/// Shared wheel state, behind an `Arc` so the dispatch loop, execution
/// units, and the owner's handle all see the same structures.
pub(crate) struct Inner {
    pub name: String,
    pub started_at: SystemTime,
    pub ring: SlotRing,
    /// Ring index currently under the cursor. Written only by the dispatch
    /// loop; read by registration for pivot-relative placement.
    pub pivot: AtomicUsize,
    pub step: Duration,
    /// One full ring traversal: `step × slot_count`.
    pub cycle: Duration,
    pub store: TaskStore,
    pub sink: ErrorSink,
    /// Number of registered, not-yet-fired tasks.
    capacity: RwLock<u64>,
    state: AtomicU8,
    pub quit: CancellationToken,
    draining: AtomicBool,
    pub semaphore: Option<Arc<Semaphore>>,
    ids: Arc<dyn IdProvider>,
}

impl Inner {
    pub fn state(&self) -> WheelState {
        WheelState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set_stopped(&self) {
        self.state
            .store(WheelState::Stopped as u8, Ordering::Release);
    }

    /// Moves the cursor one position forward and returns the new index.
    pub fn advance_pivot(&self) -> usize {
        let next = (self.pivot.load(Ordering::Acquire) + 1) % self.ring.len();
        self.pivot.store(next, Ordering::Release);
        next
    }

    pub async fn capacity(&self) -> u64 {
        *self.capacity.read().await
    }

    async fn bump_capacity(&self) {
        *self.capacity.write().await += 1;
    }

    /// Decrements the capacity count for one fired (or orphaned) entry.
    pub async fn settle_capacity(&self) {
        let mut cap = self.capacity.write().await;
        match cap.checked_sub(1) {
            Some(left) => *cap = left,
            // An underflow means an entry was accounted twice; scheduling
            // keeps working, so log instead of poisoning anything.
            None => error!("wheel {:?}: capacity underflow", self.name),
        }
    }
}

/// Read-only snapshot returned by [`TimeWheel::info`].
#[derive(Debug, Clone)]
pub struct WheelInfo {
    /// Configured wheel name.
    pub name: String,
    /// When the wheel was constructed.
    pub started_at: SystemTime,
    /// Registered, not-yet-fired tasks at snapshot time.
    pub capacity: u64,
}

/// # Hashed timing wheel.
///
/// Registers one-shot delayed tasks in O(1) and fires them from a
/// tick-driven dispatch loop. See the [crate docs](crate) for the overall
/// architecture.
///
/// The handle is cheap to clone through `Arc` internally; construction,
/// registration, and lifecycle control all go through `&self`.
pub struct TimeWheel {
    inner: Arc<Inner>,
    stream: Arc<ErrorStream>,
}

impl TimeWheel {
    /// Creates a wheel from `config` with the default ULID id provider.
    pub fn new(config: WheelConfig) -> Self {
        Self::with_id_provider(config, Arc::new(UlidProvider))
    }

    /// Creates a wheel with a custom id-generation collaborator.
    pub fn with_id_provider(config: WheelConfig, ids: Arc<dyn IdProvider>) -> Self {
        let slot_count = config.slot_count_or_default();
        let step = config.step_clamped();
        let (sink, stream) = ErrorSink::channel(
            config.error_capacity_or_default(),
            config.overflow,
        );
        let semaphore = config
            .concurrency_limit()
            .map(|n| Arc::new(Semaphore::new(n)));

        let inner = Arc::new(Inner {
            name: config.name,
            started_at: SystemTime::now(),
            ring: SlotRing::new(slot_count),
            pivot: AtomicUsize::new(0),
            step,
            cycle: step * slot_count as u32,
            store: TaskStore::default(),
            sink,
            capacity: RwLock::new(0),
            state: AtomicU8::new(WheelState::Init as u8),
            quit: CancellationToken::new(),
            draining: AtomicBool::new(false),
            semaphore,
            ids,
        });

        Self { inner, stream }
    }

    /// Registers a one-shot task to fire after `delay`.
    ///
    /// The target slot is computed relative to the current pivot, so the
    /// delay is measured from now, not from the ring's absolute zero.
    /// Returns the generated task id.
    ///
    /// # Errors
    /// - [`WheelError::InvalidDelay`] if `delay` is zero; capacity unchanged.
    /// - [`WheelError::IdGeneration`] if the id collaborator fails; no
    ///   partial state is left behind.
    pub async fn add_task(&self, delay: Duration, task: TaskRef) -> Result<String, WheelError> {
        if delay.is_zero() {
            return Err(WheelError::InvalidDelay { delay });
        }
        let id = self.inner.ids.next_id()?;

        let placement = place(
            delay,
            self.inner.step,
            self.inner.ring.len(),
            self.inner.pivot.load(Ordering::Acquire),
        );

        // Accounting first, then the handler, then the entry: by the time
        // the dispatcher can see the entry, its capacity unit is already
        // counted and its handler is already in the store. No failure path
        // follows, so the count never overstates for long.
        self.inner.bump_capacity().await;
        self.inner.store.insert(id.clone(), task).await;
        self.inner
            .ring
            .slot(placement.slot)
            .push(TaskEntry {
                id: id.clone(),
                cycles: placement.cycles,
            })
            .await;

        debug!(
            "wheel {:?}: task {} -> slot {} cycles {}",
            self.inner.name, id, placement.slot, placement.cycles,
        );
        Ok(id)
    }

    /// Starts the dispatch loop. Does not block.
    ///
    /// # Errors
    /// [`WheelError::InvalidState`] unless the wheel is still `Init`; the
    /// loop is spawned at most once per wheel.
    pub fn run(&self) -> Result<(), WheelError> {
        self.inner
            .state
            .compare_exchange(
                WheelState::Init as u8,
                WheelState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|actual| WheelError::InvalidState {
                op: "run",
                state: WheelState::from_u8(actual),
            })?;

        tokio::spawn(dispatch::run_loop(self.inner.clone()));
        Ok(())
    }

    /// Signals the dispatch loop to stop at its next scheduling point.
    ///
    /// Pending entries are abandoned: never executed, never reported.
    /// Idempotent once the wheel is stopping or stopped.
    ///
    /// # Errors
    /// [`WheelError::InvalidState`] if the wheel was never started.
    pub fn quit(&self) -> Result<(), WheelError> {
        match self.state() {
            WheelState::Init => Err(WheelError::InvalidState {
                op: "quit",
                state: WheelState::Init,
            }),
            _ => {
                self.inner.quit.cancel();
                Ok(())
            }
        }
    }

    /// Stops the wheel once every registered task has been accounted for.
    ///
    /// Spawns a watcher that polls the capacity count once per step and
    /// signals quit when it reaches zero while the wheel is still running.
    /// Returns immediately; the dispatch loop keeps firing until the backlog
    /// drains. Idempotent once a drain is underway or the wheel stopped.
    ///
    /// # Errors
    /// [`WheelError::InvalidState`] if the wheel was never started.
    pub fn blocking_quit(&self) -> Result<(), WheelError> {
        match self.state() {
            WheelState::Init => Err(WheelError::InvalidState {
                op: "blocking_quit",
                state: WheelState::Init,
            }),
            WheelState::Stopped => Ok(()),
            WheelState::Running => {
                if self.inner.draining.swap(true, Ordering::AcqRel) {
                    return Ok(());
                }
                let inner = self.inner.clone();
                tokio::spawn(async move {
                    let mut poll = time::interval(inner.step);
                    loop {
                        poll.tick().await;
                        if inner.state() != WheelState::Running {
                            break;
                        }
                        if inner.capacity().await == 0 {
                            debug!("wheel {:?}: backlog drained, quitting", inner.name);
                            inner.quit.cancel();
                            break;
                        }
                    }
                });
                Ok(())
            }
        }
    }

    /// Returns a read-only snapshot of the wheel.
    pub async fn info(&self) -> WheelInfo {
        WheelInfo {
            name: self.inner.name.clone(),
            started_at: self.inner.started_at,
            capacity: self.inner.capacity().await,
        }
    }

    /// Returns the wheel's error stream.
    ///
    /// Every call returns the same stream; there is exactly one per wheel.
    /// Under [`OverflowPolicy::Block`](crate::OverflowPolicy::Block) the
    /// owner must keep draining it, or execution units reporting failures
    /// will wait for room.
    pub fn handle_err(&self) -> Arc<ErrorStream> {
        self.stream.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WheelState {
        self.inner.state()
    }

    /// One full ring traversal: step × slot count.
    pub fn cycle_duration(&self) -> Duration {
        self.inner.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverflowPolicy;
    use crate::error::{ExecError, TaskError};
    use crate::id::IdError;
    use crate::tasks::TaskFn;

    fn small_wheel() -> TimeWheel {
        TimeWheel::new(WheelConfig {
            slot_count: 4,
            step: Duration::from_millis(10),
            error_capacity: 8,
            ..WheelConfig::new("test")
        })
    }

    fn noop() -> TaskRef {
        TaskFn::arc(|| async { Ok::<_, TaskError>(()) })
    }

    struct FailingIds;
    impl IdProvider for FailingIds {
        fn next_id(&self) -> Result<String, IdError> {
            Err(IdError("generator offline".into()))
        }
    }

    #[tokio::test]
    async fn test_id_failure_leaves_no_partial_state() {
        let wheel = TimeWheel::with_id_provider(
            WheelConfig::new("test"),
            Arc::new(FailingIds),
        );
        let err = wheel
            .add_task(Duration::from_secs(1), noop())
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "id_generation");
        assert_eq!(wheel.info().await.capacity, 0);
    }

    #[tokio::test]
    async fn test_zero_delay_rejected() {
        let wheel = small_wheel();
        let err = wheel.add_task(Duration::ZERO, noop()).await.unwrap_err();
        assert_eq!(err.as_label(), "invalid_delay");
        assert_eq!(wheel.info().await.capacity, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_is_accounted_before_it_is_visible() {
        // Hold the capacity lock so registration parks on its very first
        // effect. If anything reached the ring before the bump, a fast
        // execution unit could settle the entry first and the delayed bump
        // would leave one phantom unit of capacity, wedging any drain.
        let wheel = Arc::new(small_wheel());
        let gate = wheel.inner.capacity.write().await;

        let w = wheel.clone();
        let reg = tokio::spawn(async move {
            w.add_task(Duration::from_millis(10), noop()).await.unwrap()
        });
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        // One step ahead of pivot 0 is slot 1; it must still be empty.
        assert_eq!(wheel.inner.ring.slot(1).len().await, 0);

        drop(gate);
        let id = reg.await.unwrap();
        assert_eq!(wheel.inner.capacity().await, 1);
        assert_eq!(wheel.inner.ring.slot(1).len().await, 1);
        assert!(wheel.inner.store.remove(&id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_handler_reports_not_found_and_loop_survives() {
        let wheel = small_wheel();
        wheel.run().unwrap();

        let orphan = wheel
            .add_task(Duration::from_millis(20), noop())
            .await
            .unwrap();
        // Force the inconsistency: entry stays in its slot, handler is gone.
        wheel.inner.store.remove(&orphan).await.unwrap();

        time::sleep(Duration::from_millis(35)).await;

        let errs = wheel.handle_err();
        match errs.try_recv().await {
            Some(ExecError::TaskNotFound { id }) => assert_eq!(id, orphan),
            other => panic!("expected TaskNotFound, got {other:?}"),
        }
        assert!(errs.try_recv().await.is_none(), "exactly one report");
        assert_eq!(wheel.info().await.capacity, 0, "still settled once");

        // The loop kept going: a later task still fires.
        let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = fired.clone();
        wheel
            .add_task(
                Duration::from_millis(20),
                TaskFn::arc(move || {
                    let flag = flag.clone();
                    async move {
                        flag.store(true, Ordering::SeqCst);
                        Ok::<_, TaskError>(())
                    }
                }),
            )
            .await
            .unwrap();
        time::sleep(Duration::from_millis(35)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_sink_defers_capacity_settling() {
        // Block policy with a full sink: the execution unit waits to report,
        // so the entry stays accounted until the owner drains the stream.
        let wheel = TimeWheel::new(WheelConfig {
            slot_count: 4,
            step: Duration::from_millis(10),
            error_capacity: 1,
            overflow: OverflowPolicy::Block,
            ..WheelConfig::new("test")
        });
        wheel.run().unwrap();

        for _ in 0..2 {
            wheel
                .add_task(
                    Duration::from_millis(10),
                    TaskFn::arc(|| async { Err::<(), _>(TaskError::fail("boom")) }),
                )
                .await
                .unwrap();
        }
        time::sleep(Duration::from_millis(50)).await;

        // One failure buffered, one producer parked on the full sink.
        assert_eq!(wheel.info().await.capacity, 1);

        let errs = wheel.handle_err();
        assert!(errs.recv().await.is_some());
        assert!(errs.recv().await.is_some());
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(wheel.info().await.capacity, 0);
    }
}
