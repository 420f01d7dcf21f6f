//! # linepool
//!
//! **linepool** is a line-oriented stream processor backed by a pool of
//! concurrent workers whose size can be changed while the stream is being
//! consumed. A producer reads records from an input file onto a shared
//! queue; workers compete for records, transliterate them, and append the
//! results to an output file, publishing their lifecycle onto an event bus
//! that feeds a log file and the operator's console. An interactive menu
//! adds workers, removes a specific worker by identifier, lists the live
//! identifiers, or triggers a coordinated shutdown, concurrently with the
//! producer still feeding the queue.
//!
//! ## Architecture
//! ```text
//!    input file                     operator stdin
//!        │                               │
//!        ▼                               ▼
//!   Producer Loop                  Control Loop
//!        │                               │ add / remove / list / shutdown
//!        ▼                               ▼
//!   shared queue ◄────────────── WorkerPool
//!    (MPMC, bounded)              ├─ registry: id → cancellation token
//!        │                        ├─ id allocator (reuse-preferring)
//!        ├────────┬────────┐      └─ shutdown barrier (tracks loop exits)
//!        ▼        ▼        ▼
//!     Worker₁  Worker₂  Workerₙ ──► output sink (line-atomic appends)
//!        │        │        │
//!        └────────┴────────┴── Events ──► Bus ──► SubscriberSet
//!                                                   ├─► LogWriter (log file)
//!                                                   └─► ConsoleWriter (stdout)
//! ```
//!
//! ## Lifecycle
//! ```text
//! Coordinator::run()
//!   ├─► spawn Producer Loop: read line ─► queue.push ─► ... ─► queue.close()
//!   ├─► spawn Control Loop:  token ─► pool operation
//!   │
//!   ├─ producer finishes ─► stop soliciting ─► pool.shutdown() ─► done
//!   └─ operator quits ────► pool.shutdown() ─────────────────── ► done
//!
//! pool.shutdown():
//!   close queue ─► remove every worker ─► wait for the barrier to hit zero
//!   (safe to invoke redundantly; the barrier stays at zero once reached)
//! ```
//!
//! ## Guarantees
//! - Worker identifiers are unique among live workers and reused
//!   smallest-first after removal; a reused identifier never aliases its
//!   predecessor's cancellation signal.
//! - Records accepted by the queue are never silently dropped: workers drain
//!   a closed queue before exiting, and a push after closure is an error.
//! - Output ordering across workers is unspecified; sink lines are atomic.
//! - Shutdown waits for every worker loop that ever started, while removal
//!   of a single worker stays fire-and-forget.

mod config;
mod core;
mod error;
mod events;
mod io;
mod subscribers;
mod transform;

// ---- Public re-exports ----

pub use crate::config::Config;
pub use crate::core::{Coordinator, JobQueue, WorkerPool};
pub use crate::error::{ConfigError, RuntimeError};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::io::{RecordSource, Sink};
pub use crate::subscribers::{ConsoleWriter, LogWriter, Subscribe, SubscriberSet};
pub use crate::transform::{process, transliterate, PROCESS_DELAY};
