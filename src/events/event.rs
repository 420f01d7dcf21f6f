//! Runtime events emitted by the pool, the workers, and the producer.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Pool management**: add/remove/list outcomes and pool shutdown
//! - **Worker lifecycle**: loop entry, per-record processing, the three exit causes
//! - **Source lifecycle**: input exhausted or failed
//!
//! [`Event`] carries optional metadata (worker identifier, the record that
//! was processed, a human-readable reason) attached builder-style. Each event
//! gets a globally unique, monotonically increasing sequence number so
//! subscribers can restore order if delivery interleaves.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Pool management events ===
    /// A worker was allocated an identifier and registered.
    ///
    /// Sets: `worker`.
    WorkerAdded,

    /// A worker was cancelled and deregistered on an operator request.
    ///
    /// Removal is fire-and-forget; the worker's own exit is reported
    /// separately by [`EventKind::WorkerCancelled`]. Sets: `worker`.
    WorkerRemoved,

    /// A removal request named an identifier with no live worker.
    ///
    /// Carries only the requested identifier; no registry state is read or
    /// mutated on this path. Sets: `worker`.
    WorkerNotFound,

    /// Every worker loop has exited and the pool's barrier reached zero.
    PoolShutdown,

    // === Worker lifecycle events ===
    /// A worker loop started executing.
    ///
    /// Sets: `worker`.
    WorkerStarted,

    /// A worker transformed one record and appended it to the sink.
    ///
    /// Sets: `worker`, `record` (the original, untransformed line).
    RecordProcessed,

    /// A worker exited because the queue was closed and drained.
    ///
    /// Sets: `worker`.
    WorkerDrained,

    /// A worker exited because its cancellation signal fired.
    ///
    /// Sets: `worker`.
    WorkerCancelled,

    // === Source lifecycle events ===
    /// The producer exhausted the input and closed the queue.
    SourceExhausted,

    /// The producer hit a read failure or a closed queue and stopped early.
    ///
    /// Sets: `reason`.
    SourceFailed,
}

impl EventKind {
    /// Returns a short stable label for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::WorkerAdded => "added",
            EventKind::WorkerRemoved => "removed",
            EventKind::WorkerNotFound => "not-found",
            EventKind::PoolShutdown => "pool-shutdown",
            EventKind::WorkerStarted => "started",
            EventKind::RecordProcessed => "processed",
            EventKind::WorkerDrained => "drained",
            EventKind::WorkerCancelled => "cancelled",
            EventKind::SourceExhausted => "source-exhausted",
            EventKind::SourceFailed => "source-failed",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Worker identifier, if applicable.
    pub worker: Option<u32>,
    /// The record this event is about (original input line).
    pub record: Option<Arc<str>>,
    /// Human-readable reason (errors, failure details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            record: None,
            reason: None,
        }
    }

    /// Attaches a worker identifier.
    #[inline]
    pub fn with_worker(mut self, worker: u32) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches the record the event is about.
    #[inline]
    pub fn with_record(mut self, record: impl Into<Arc<str>>) -> Self {
        self.record = Some(record.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::now(EventKind::RecordProcessed)
            .with_worker(3)
            .with_record("привет");
        assert_eq!(ev.kind, EventKind::RecordProcessed);
        assert_eq!(ev.worker, Some(3));
        assert_eq!(ev.record.as_deref(), Some("привет"));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::now(EventKind::WorkerAdded);
        let b = Event::now(EventKind::WorkerAdded);
        assert!(b.seq > a.seq);
    }
}
