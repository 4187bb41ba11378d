//! Bounded, drop-on-full status channel.
//!
//! [`ChannelStatusSink`] is the producer half handed to the tool invoker;
//! the receiver goes to whatever renders events (console, UI bridge). A
//! slow or vanished consumer never stalls a tool call: when the queue is
//! full or closed the event is dropped and counted.

use relay_application::ports::status::{StatusEvent, StatusSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::trace;

/// Default queue capacity
pub const DEFAULT_STATUS_CAPACITY: usize = 256;

/// Largest capacity a bounded tokio channel accepts
pub const MAX_STATUS_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Producer half of the status channel
#[derive(Debug, Clone)]
pub struct ChannelStatusSink {
    tx: Sender<StatusEvent>,
    dropped: Arc<AtomicU64>,
}

impl ChannelStatusSink {
    /// Events dropped so far (queue full or receiver gone)
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl StatusSink for ChannelStatusSink {
    fn notify(&self, event: StatusEvent) {
        if let Err(e) = self.tx.try_send(event) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            match e {
                TrySendError::Full(event) => {
                    trace!(call_id = event.call_id(), "Status queue full, dropping event")
                }
                TrySendError::Closed(event) => {
                    trace!(call_id = event.call_id(), "Status receiver gone, dropping event")
                }
            }
        }
    }
}

/// Create a status channel holding at most `capacity` undelivered events.
///
/// Capacity is clamped to `1..=MAX_STATUS_CAPACITY`.
pub fn status_channel(capacity: usize) -> (ChannelStatusSink, Receiver<StatusEvent>) {
    let (tx, rx) = mpsc::channel(capacity.clamp(1, MAX_STATUS_CAPACITY));
    (
        ChannelStatusSink {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        rx,
    )
}
