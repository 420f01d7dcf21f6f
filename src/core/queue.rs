//! Shared record queue.
//!
//! [`JobQueue`] is a bounded MPMC channel: one producer pushes, every worker
//! holds its own cloned receiver and competes for records. Cloned receivers
//! keep the receive path lock-free; a shared `Mutex<Receiver>` would let one
//! blocked worker starve the rest.
//!
//! ## Rules
//! - FIFO relative to the queue itself; completion order across workers is
//!   unspecified.
//! - A full queue blocks the pushing producer. That blocking is the system's
//!   only back-pressure mechanism.
//! - Closed at most once, by the producer, after it finished enqueueing.
//!   Receivers drain remaining records and then observe closed-and-empty as
//!   a normal termination condition.

use async_channel::{Receiver, Sender};

use crate::error::RuntimeError;

/// Handle a worker consumes records through.
pub(crate) type JobReader = Receiver<String>;

/// Bounded multi-producer multi-consumer queue of records.
#[derive(Clone)]
pub struct JobQueue {
    tx: Sender<String>,
    rx: Receiver<String>,
}

impl JobQueue {
    /// Creates a queue with the given capacity (minimum 1).
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        Self { tx, rx }
    }

    /// Pushes one record, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::QueueClosed`] if the queue has been closed;
    /// the record is not silently dropped, the caller decides how to report
    /// it.
    pub async fn push(&self, record: String) -> Result<(), RuntimeError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| RuntimeError::QueueClosed)
    }

    /// Closes the queue. Records already enqueued remain receivable.
    ///
    /// Returns `false` if the queue was already closed.
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    /// Creates an independent competing-consumer handle for one worker.
    pub(crate) fn reader(&self) -> JobReader {
        self.rx.clone()
    }
}
