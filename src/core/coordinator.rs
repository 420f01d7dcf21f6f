//! Coordinator: wires the pipeline together and drives it to completion.
//!
//! The coordinator owns the bus, the subscriber set, the queue, the sink,
//! and the pool. `run()` spawns the producer loop and the control loop as
//! independent tasks sharing the one pool, then waits for a single
//! completion signal that either side can raise.
//!
//! ## Completion paths
//! ```text
//! producer EOF/failure ──► raise control stop ─► pool.shutdown() ─► done
//! operator quit (0)    ──► pool.shutdown() ──────────────────────► done
//! operator input ends  ──► control loop exits, producer path concludes
//! ```
//!
//! Both paths call `shutdown()` on their own; the pool makes that redundant
//! invocation safe, and `done` is a `CancellationToken`, so whichever path
//! fires first is authoritative and the second cancel is a no-op.
//!
//! After `done`, the remaining loop tasks are aborted (mirroring process
//! exit in the original design: a producer still blocked pushing into a full
//! queue must not keep the process alive), the bus is torn down, and the
//! subscriber set is drained so every published event reaches the log before
//! the process exits.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::control::{self, ControlOutcome};
use crate::core::pool::WorkerPool;
use crate::core::producer;
use crate::core::queue::JobQueue;
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::io::Sink;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Top-level runtime for one pipeline run.
pub struct Coordinator {
    input_file: PathBuf,
    queue: JobQueue,
    sink: Arc<Sink>,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    pool: Arc<WorkerPool>,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("input_file", &self.input_file)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Builds the runtime: creates the sink (fatal if the output file cannot
    /// be created), the bus, the queue, the pool, and the subscriber set.
    pub async fn bootstrap(
        cfg: &Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, RuntimeError> {
        let sink = Arc::new(Sink::create(&cfg.output_file).await.map_err(|source| {
            RuntimeError::Io {
                path: cfg.output_file.clone(),
                source,
            }
        })?);
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let queue = JobQueue::bounded(cfg.queue_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers));
        let pool = WorkerPool::new(queue.clone(), Arc::clone(&sink), bus.clone());

        Ok(Self {
            input_file: cfg.input_file.clone(),
            queue,
            sink,
            bus,
            subs,
            pool,
        })
    }

    /// Runs the pipeline until either the producer or the operator concludes
    /// it, then drains the event side-channel.
    pub async fn run<R>(self, operator_input: R)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let listener = self.spawn_subscriber_listener();
        let done = CancellationToken::new();
        let control_stop = CancellationToken::new();

        let producer_task = {
            let input = self.input_file.clone();
            let queue = self.queue.clone();
            let sink = Arc::clone(&self.sink);
            let bus = self.bus.clone();
            let pool = Arc::clone(&self.pool);
            let control_stop = control_stop.clone();
            let done = done.clone();
            tokio::spawn(async move {
                // Failures were already reported to the sink and the bus;
                // both outcomes conclude through the same shutdown path.
                let _ = producer::run(&input, &queue, &sink, &bus).await;
                control_stop.cancel();
                pool.shutdown().await;
                done.cancel();
            })
        };

        let control_task = {
            let pool = Arc::clone(&self.pool);
            let done = done.clone();
            tokio::spawn(async move {
                match control::run(&pool, operator_input, &control_stop).await {
                    // Quit already shut the pool down inside the loop.
                    ControlOutcome::Quit => done.cancel(),
                    // The producer's completion path concludes the run.
                    ControlOutcome::InputEnded | ControlOutcome::Stopped => {}
                }
            })
        };

        done.cancelled().await;

        // Whichever loop is still running is blocked on I/O the run no
        // longer needs (a full queue, an idle stdin). Abort mirrors the
        // process exit of the original design.
        producer_task.abort();
        control_task.abort();
        let _ = producer_task.await;
        let _ = control_task.await;

        // Tear down every bus sender so the listener drains and exits, then
        // flush the subscribers.
        let Self {
            queue,
            sink,
            bus,
            subs,
            pool,
            ..
        } = self;
        drop(pool);
        drop(bus);
        drop(queue);
        drop(sink);
        let _ = listener.await;
        if let Ok(set) = Arc::try_unwrap(subs) {
            set.shutdown().await;
        }
    }

    /// Forwards bus events to the subscriber set until every sender is gone.
    fn spawn_subscriber_listener(&self) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subs.emit(&ev),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        })
    }
}
