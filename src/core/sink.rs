//! Error sink: bounded delivery of execution failures to the wheel's owner.
//!
//! Execution units report [`ExecError`]s here; the owner drains them through
//! the [`ErrorStream`] returned by
//! [`TimeWheel::handle_err`](crate::TimeWheel::handle_err).
//!
//! ## Overflow
//! The channel is bounded by the configured capacity. When full:
//! - [`OverflowPolicy::Block`]: producers wait for the consumer. The owner
//!   is contractually obliged to keep draining the stream.
//! - [`OverflowPolicy::DropNewest`]: the failure is dropped, counted, and
//!   logged at warn level; producers never wait.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

use crate::config::OverflowPolicy;
use crate::error::ExecError;

/// Producer side, held by the wheel and cloned into execution units.
#[derive(Debug, Clone)]
pub(crate) struct ErrorSink {
    tx: mpsc::Sender<ExecError>,
    policy: OverflowPolicy,
    dropped: Arc<AtomicU64>,
}

impl ErrorSink {
    /// Creates the sink and its matching stream.
    pub fn channel(capacity: usize, policy: OverflowPolicy) -> (Self, Arc<ErrorStream>) {
        let (tx, rx) = mpsc::channel(capacity);
        let dropped = Arc::new(AtomicU64::new(0));
        let sink = Self {
            tx,
            policy,
            dropped: dropped.clone(),
        };
        let stream = Arc::new(ErrorStream {
            rx: Mutex::new(rx),
            capacity,
            dropped,
        });
        (sink, stream)
    }

    /// Reports a failure according to the overflow policy.
    pub async fn report(&self, err: ExecError) {
        match self.policy {
            OverflowPolicy::Block => {
                // Only fails if the stream was dropped with the wheel.
                let _ = self.tx.send(err).await;
            }
            OverflowPolicy::DropNewest => {
                if let Err(TrySendError::Full(err)) = self.tx.try_send(err) {
                    let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!("error sink full, dropped {} ({} total)", err.as_label(), total);
                }
            }
        }
    }
}

/// Read side of the error sink.
///
/// [`TimeWheel::handle_err`](crate::TimeWheel::handle_err) hands out the same
/// `Arc<ErrorStream>` on every call; there is exactly one stream per wheel.
#[derive(Debug)]
pub struct ErrorStream {
    rx: Mutex<mpsc::Receiver<ExecError>>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl ErrorStream {
    /// Receives the next failure, waiting until one is reported.
    ///
    /// Returns `None` once the wheel has been dropped and all buffered
    /// failures were drained.
    pub async fn recv(&self) -> Option<ExecError> {
        self.rx.lock().await.recv().await
    }

    /// Receives a buffered failure without waiting.
    pub async fn try_recv(&self) -> Option<ExecError> {
        self.rx.lock().await.try_recv().ok()
    }

    /// The configured bound of this stream.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Failures dropped so far under [`OverflowPolicy::DropNewest`].
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
