//! Operator-facing console subscriber.
//!
//! [`ConsoleWriter`] mirrors the management events the operator cares about
//! onto stdout, next to the interactive menu: worker started/stopped, unknown
//! identifier, pool shutdown, and end of input. Worker-internal lifecycle
//! noise stays in the log file.

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Prints management events to stdout for the operator.
pub struct ConsoleWriter;

#[async_trait]
impl Subscribe for ConsoleWriter {
    async fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::WorkerAdded => {
                if let Some(worker) = event.worker {
                    println!("worker {worker} started");
                }
            }
            EventKind::WorkerRemoved => {
                if let Some(worker) = event.worker {
                    println!("worker {worker} stopped");
                }
            }
            EventKind::WorkerNotFound => {
                if let Some(worker) = event.worker {
                    println!("worker {worker} not found");
                }
            }
            EventKind::PoolShutdown => {
                println!("worker pool shut down");
            }
            EventKind::SourceExhausted => {
                println!("input exhausted, shutting down");
            }
            EventKind::SourceFailed => {
                if let Some(reason) = &event.reason {
                    println!("input failed: {reason}");
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console-writer"
    }

    fn queue_capacity(&self) -> usize {
        64
    }
}
