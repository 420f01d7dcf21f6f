//! Worker loop: one competing consumer over the shared queue.
//!
//! Each worker races two events per iteration: a record arriving on the
//! queue, and its private cancellation signal. The select is unbiased, so
//! cancellation takes effect between record hand-offs, never mid-record.
//!
//! A cancelled worker that finds the queue already closed keeps consuming
//! until the queue is empty: a closed queue holds records the system already
//! accepted, and accepted work is never dropped. Cancellation with the queue
//! still open exits immediately.
//!
//! ## Exit causes
//! Exactly one of three, each with its own event so operators can tell them
//! apart in the log:
//! - queue closed and drained → [`EventKind::WorkerDrained`]
//! - cancellation signal fired while the queue was open → [`EventKind::WorkerCancelled`]
//! - process exit (implicit, not observable from inside the loop)
//!
//! Every processed record produces exactly one sink line and one
//! [`EventKind::RecordProcessed`] event.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::queue::JobReader;
use crate::events::{Bus, Event, EventKind};
use crate::io::Sink;
use crate::transform;

/// Everything a worker loop needs besides its cancellation signal.
pub(crate) struct WorkerContext {
    /// Pool-assigned identifier, unique among live workers.
    pub(crate) id: u32,
    /// Competing-consumer handle on the shared queue.
    pub(crate) jobs: JobReader,
    /// Shared output sink.
    pub(crate) sink: Arc<Sink>,
    /// Event side-channel.
    pub(crate) bus: Bus,
}

/// Runs one worker until the queue drains or the signal fires.
pub(crate) async fn worker_loop(ctx: WorkerContext, cancel: CancellationToken) {
    let WorkerContext { id, jobs, sink, bus } = ctx;
    bus.publish(Event::now(EventKind::WorkerStarted).with_worker(id));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if jobs.is_closed() {
                    drain(id, &jobs, &sink, &bus).await;
                } else {
                    bus.publish(Event::now(EventKind::WorkerCancelled).with_worker(id));
                }
                return;
            }
            record = jobs.recv() => match record {
                Ok(record) => process_one(id, record, &sink, &bus).await,
                Err(_closed) => {
                    bus.publish(Event::now(EventKind::WorkerDrained).with_worker(id));
                    return;
                }
            }
        }
    }
}

/// Consumes the remainder of a closed queue, then reports the drained exit.
async fn drain(id: u32, jobs: &JobReader, sink: &Arc<Sink>, bus: &Bus) {
    while let Ok(record) = jobs.recv().await {
        process_one(id, record, sink, bus).await;
    }
    bus.publish(Event::now(EventKind::WorkerDrained).with_worker(id));
}

/// Transforms one record, appends it to the sink, reports it processed.
async fn process_one(id: u32, record: String, sink: &Arc<Sink>, bus: &Bus) {
    let transformed = transform::process(&record).await;
    // Sink writes are assumed infallible in the normal operating envelope;
    // a failure is not retried.
    let _ = sink.append_line(&transformed).await;
    bus.publish(
        Event::now(EventKind::RecordProcessed)
            .with_worker(id)
            .with_record(record),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::queue::JobQueue;

    async fn fixture() -> (JobQueue, Arc<Sink>, Bus, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(Sink::create(&dir.path().join("out.txt")).await.unwrap());
        (JobQueue::bounded(8), sink, Bus::new(64), dir)
    }

    #[tokio::test]
    async fn test_drains_closed_queue_then_exits() {
        let (queue, sink, bus, dir) = fixture().await;
        queue.push("привет".into()).await.unwrap();
        queue.push("мир".into()).await.unwrap();
        queue.close();

        let mut rx = bus.subscribe();
        let cancel = CancellationToken::new();
        let ctx = WorkerContext {
            id: 1,
            jobs: queue.reader(),
            sink,
            bus: bus.clone(),
        };
        tokio::spawn(worker_loop(ctx, cancel)).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::WorkerStarted,
                EventKind::RecordProcessed,
                EventKind::RecordProcessed,
                EventKind::WorkerDrained,
            ]
        );

        let contents = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["mir", "privet"]);
    }

    #[tokio::test]
    async fn test_cancellation_stops_idle_worker() {
        let (queue, sink, bus, _dir) = fixture().await;
        let mut rx = bus.subscribe();
        let cancel = CancellationToken::new();
        let ctx = WorkerContext {
            id: 7,
            jobs: queue.reader(),
            sink,
            bus: bus.clone(),
        };
        let handle = tokio::spawn(worker_loop(ctx, cancel.clone()));

        cancel.cancel();
        handle.await.unwrap();

        let started = rx.recv().await.unwrap();
        assert_eq!(started.kind, EventKind::WorkerStarted);
        let stopped = rx.recv().await.unwrap();
        assert_eq!(stopped.kind, EventKind::WorkerCancelled);
        assert_eq!(stopped.worker, Some(7));
    }

    #[tokio::test]
    async fn test_cancelled_worker_finishes_closed_queue() {
        let (queue, sink, bus, dir) = fixture().await;
        for record in ["один", "два", "три"] {
            queue.push(record.into()).await.unwrap();
        }
        queue.close();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let ctx = WorkerContext {
            id: 2,
            jobs: queue.reader(),
            sink,
            bus: bus.clone(),
        };
        tokio::spawn(worker_loop(ctx, cancel)).await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["dva", "odin", "tri"]);
    }
}
