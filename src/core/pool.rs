//! Worker pool: registry, identifier allocation, and the shutdown barrier.
//!
//! The pool owns the shared queue handle, the live-worker registry, the
//! identifier allocator, and the barrier that counts outstanding worker
//! loops. Both the control loop and the producer's shutdown path mutate the
//! pool concurrently, so registry and allocator live behind a single mutex;
//! no operation touches them without that guard.
//!
//! ## Architecture
//! ```text
//! add_worker()     ──► allocate id ─► fresh token ─► spawn loop (tracked)
//! remove_worker(n) ──► take handle ─► cancel token ─► release id
//!                      (absent: report not-found, mutate nothing)
//! shutdown()       ──► remove every id ─► close barrier ─► wait to zero
//! ```
//!
//! ## Rules
//! - Removal is fire-and-forget: it signals and deregisters but never waits
//!   for the worker's loop to observe the signal.
//! - The barrier tracks actual loop exit (a worker leaves the count when its
//!   loop returns, not when it is deregistered), so `shutdown()`'s wait is
//!   meaningful.
//! - `shutdown()` is safe to invoke redundantly: once the barrier reaches
//!   zero it stays there.
//! - The registry may briefly retain a worker that already exited on its own
//!   (queue drained); termination is asynchronous relative to registry
//!   removal.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::core::ids::IdAllocator;
use crate::core::queue::JobQueue;
use crate::core::worker::{worker_loop, WorkerContext};
use crate::events::{Bus, Event, EventKind};
use crate::io::Sink;

/// Registry entry for one live worker.
struct WorkerHandle {
    /// Private cancellation signal; never shared with a successor reusing
    /// the same identifier.
    cancel: CancellationToken,
}

/// Registry and allocator, guarded together.
struct PoolState {
    workers: HashMap<u32, WorkerHandle>,
    ids: IdAllocator,
}

/// Dynamically sized pool of competing consumers over one shared queue.
pub struct WorkerPool {
    state: Mutex<PoolState>,
    tracker: TaskTracker,
    queue: JobQueue,
    sink: Arc<Sink>,
    bus: Bus,
}

impl WorkerPool {
    /// Creates an empty pool bound to the given queue, sink, and bus.
    pub fn new(queue: JobQueue, sink: Arc<Sink>, bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PoolState {
                workers: HashMap::new(),
                ids: IdAllocator::new(),
            }),
            tracker: TaskTracker::new(),
            queue,
            sink,
            bus,
        })
    }

    /// Starts a new worker and returns its identifier.
    ///
    /// The identifier is the smallest released one if any, otherwise freshly
    /// minted. May be called at any time, including while the queue is being
    /// fed.
    pub async fn add_worker(&self) -> u32 {
        let cancel = CancellationToken::new();
        let id = {
            let mut state = self.state.lock().await;
            let id = state.ids.acquire();
            state.workers.insert(
                id,
                WorkerHandle {
                    cancel: cancel.clone(),
                },
            );
            id
        };

        self.bus
            .publish(Event::now(EventKind::WorkerAdded).with_worker(id));

        let ctx = WorkerContext {
            id,
            jobs: self.queue.reader(),
            sink: Arc::clone(&self.sink),
            bus: self.bus.clone(),
        };
        self.tracker.spawn(worker_loop(ctx, cancel));
        id
    }

    /// Cancels and deregisters the worker with the given identifier.
    ///
    /// Returns `true` if the worker existed. An unknown identifier is
    /// reported using only the identifier itself and mutates nothing. Does
    /// not wait for the worker's loop to exit.
    pub async fn remove_worker(&self, id: u32) -> bool {
        let handle = {
            let mut state = self.state.lock().await;
            match state.workers.remove(&id) {
                Some(handle) => {
                    state.ids.release(id);
                    Some(handle)
                }
                None => None,
            }
        };

        match handle {
            Some(handle) => {
                handle.cancel.cancel();
                self.bus
                    .publish(Event::now(EventKind::WorkerRemoved).with_worker(id));
                true
            }
            None => {
                self.bus
                    .publish(Event::now(EventKind::WorkerNotFound).with_worker(id));
                false
            }
        }
    }

    /// Returns the identifiers currently registered, sorted.
    ///
    /// Order is an implementation convenience; the contract is set
    /// semantics.
    pub async fn list_workers(&self) -> Vec<u32> {
        let state = self.state.lock().await;
        let mut ids: Vec<u32> = state.workers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of currently registered workers.
    pub async fn worker_count(&self) -> usize {
        self.state.lock().await.workers.len()
    }

    /// Removes every registered worker, then blocks until every worker loop
    /// ever started has exited.
    ///
    /// The queue is closed up front: records accepted so far stay available
    /// for workers to drain before they exit, and any later push is surfaced
    /// to the producer as an error instead of being silently dropped.
    ///
    /// Redundant calls are safe: the second call finds an empty registry and
    /// a barrier already at zero, and returns immediately after re-reporting
    /// completion.
    pub async fn shutdown(&self) {
        self.queue.close();
        for id in self.list_workers().await {
            self.remove_worker(id).await;
        }
        self.tracker.close();
        self.tracker.wait().await;
        self.bus.publish(Event::now(EventKind::PoolShutdown));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        pool: Arc<WorkerPool>,
        queue: JobQueue,
        out_path: std::path::PathBuf,
        _dir: tempfile::TempDir,
    }

    async fn fixture(queue_capacity: usize) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.txt");
        let sink = Arc::new(Sink::create(&out_path).await.unwrap());
        let queue = JobQueue::bounded(queue_capacity);
        let pool = WorkerPool::new(queue.clone(), sink, Bus::new(256));
        Fixture {
            pool,
            queue,
            out_path,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_ids_allocate_reuse_and_list() {
        let f = fixture(4).await;

        assert_eq!(f.pool.add_worker().await, 1);
        assert_eq!(f.pool.add_worker().await, 2);
        assert_eq!(f.pool.add_worker().await, 3);

        assert!(f.pool.remove_worker(2).await);
        assert_eq!(f.pool.list_workers().await, vec![1, 3]);

        // 2 is the only released identifier, the next add must receive it.
        assert_eq!(f.pool.add_worker().await, 2);
        assert_eq!(f.pool.list_workers().await, vec![1, 2, 3]);

        f.pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_removal_changes_nothing() {
        let f = fixture(4).await;
        f.pool.add_worker().await;

        assert!(!f.pool.remove_worker(42).await);
        assert_eq!(f.pool.list_workers().await, vec![1]);
        // The unknown identifier must not enter the reuse pool.
        assert_eq!(f.pool.add_worker().await, 2);

        f.pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_reused_id_gets_fresh_cancellation() {
        let f = fixture(4).await;
        f.pool.add_worker().await;
        f.pool.remove_worker(1).await;

        // Successor reuses id 1 but must not inherit the cancelled signal:
        // it has to still be alive to drain the queue.
        assert_eq!(f.pool.add_worker().await, 1);
        f.queue.push("привет".into()).await.unwrap();
        f.queue.close();
        f.pool.shutdown().await;

        let contents = std::fs::read_to_string(&f.out_path).unwrap();
        assert_eq!(contents, "privet\n");
    }

    #[tokio::test]
    async fn test_drain_completeness() {
        let f = fixture(2).await;
        f.pool.add_worker().await;
        f.pool.add_worker().await;

        let records = ["привет", "Виктор", "Хлеб", "hello", "мир", "чай"];
        for record in records {
            f.queue.push(record.to_string()).await.unwrap();
        }
        f.queue.close();
        f.pool.shutdown().await;

        let contents = std::fs::read_to_string(&f.out_path).unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        lines.sort_unstable();
        let mut expected = vec!["privet", "Viktor", "Khleb", "hello", "mir", "chay"];
        expected.sort_unstable();
        assert_eq!(lines, expected, "every record exactly once");
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let f = fixture(4).await;
        f.pool.add_worker().await;
        f.pool.add_worker().await;

        f.pool.shutdown().await;
        assert_eq!(f.pool.worker_count().await, 0);

        // Second call must not re-block or disturb the final state.
        f.pool.shutdown().await;
        assert_eq!(f.pool.worker_count().await, 0);
    }

    #[tokio::test]
    async fn test_early_shutdown_drains_accepted_records() {
        let f = fixture(4).await;
        f.pool.add_worker().await;
        f.queue.push("привет".into()).await.unwrap();
        f.queue.push("мир".into()).await.unwrap();

        // Shutdown before the producer would have closed the queue: accepted
        // records still land in the sink before the barrier releases, and a
        // late push is an error rather than a silent drop.
        f.pool.shutdown().await;
        assert!(f.queue.push("поздно".into()).await.is_err());

        let contents = std::fs::read_to_string(&f.out_path).unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["mir", "privet"]);
    }
}
