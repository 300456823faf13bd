//! # tickwheel
//!
//! **Tickwheel** is a hashed timing-wheel scheduler for one-shot delayed tasks.
//!
//! It registers large numbers of delayed callbacks with O(1) insertion and
//! bounded per-tick processing cost, instead of one timer per task. It is a
//! building block for session expiry, retry backoff, TTL eviction, and
//! similar delayed-work patterns.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  add_task(delay, handler)
//!        │
//!        ├─► IdProvider::next_id()               (collaborator, ULID default)
//!        ├─► placement: (pivot + steps) % slots  (pivot-relative)
//!        ├─► capacity += 1,  TaskStore[id] = handler
//!        └─► slots[slot].push({id, cycles})
//!
//!  ┌─────────────────────────────────────────────────────────────┐
//!  │  TimeWheel                                                  │
//!  │                                                             │
//!  │   slots: [ S0 ][ S1 ][ S2 ] ... [ Sn-1 ]   (lock per slot)  │
//!  │              ▲                                              │
//!  │            pivot ── advances once per step                  │
//!  │                                                             │
//!  │  dispatch loop (one per wheel):                             │
//!  │    every step: pivot += 1; take due entries from the slot   │
//!  │      cycles == 0 → spawn execution unit                     │
//!  │      cycles  > 0 → cycles -= 1                              │
//!  └──────────────────────────┬──────────────────────────────────┘
//!                             ▼
//!              execution units (tokio::spawn, one per due entry,
//!              optionally gated by a shared semaphore)
//!                             │
//!                   failures  ▼
//!              ErrorSink (bounded) ──► ErrorStream ──► owner
//! ```
//!
//! ### Lifecycle
//! ```text
//!          run()                 quit() / blocking_quit()
//!  Init ──────────► Running ─────────────────────────────► Stopped
//! ```
//! - [`TimeWheel::run`] starts the dispatch loop exactly once.
//! - [`TimeWheel::quit`] stops at the next scheduling point; pending tasks
//!   are abandoned unfired.
//! - [`TimeWheel::blocking_quit`] defers the stop until the capacity count
//!   (registered, unfired tasks) drains to zero.
//!
//! ## Guarantees
//! | Property | Behavior |
//! |---|---|
//! | **Insertion** | O(1); never blocks on unrelated slots |
//! | **Firing** | no earlier than the configured delay, measured from registration |
//! | **Ordering** | none among tasks due in the same tick |
//! | **Retry** | none; each task fires at most once |
//! | **Failures** | delivered asynchronously via [`ErrorStream`], never to the registering caller |
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use tickwheel::{TaskError, TaskFn, TimeWheel, WheelConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wheel = TimeWheel::new(WheelConfig {
//!         slot_count: 60,
//!         step: Duration::from_secs(1),
//!         ..WheelConfig::new("sessions")
//!     });
//!     wheel.run()?;
//!
//!     let errs = wheel.handle_err();
//!     tokio::spawn(async move {
//!         while let Some(err) = errs.recv().await {
//!             eprintln!("task failed: {err}");
//!         }
//!     });
//!
//!     let id = wheel
//!         .add_task(Duration::from_secs(5), TaskFn::arc(|| async {
//!             println!("five seconds later");
//!             Ok::<_, TaskError>(())
//!         }))
//!         .await?;
//!     println!("registered {id}");
//!
//!     // Let the backlog drain, then stop.
//!     wheel.blocking_quit()?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod id;
mod tasks;

// ---- Public re-exports ----

pub use config::{OverflowPolicy, WheelConfig, DEFAULT_ERROR_CAPACITY, DEFAULT_SLOT_COUNT, MIN_STEP};
pub use crate::core::{ErrorStream, TimeWheel, WheelInfo, WheelState};
pub use error::{ExecError, TaskError, WheelError};
pub use id::{IdError, IdProvider, UlidProvider};
pub use tasks::{Task, TaskFn, TaskRef};
