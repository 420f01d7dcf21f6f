//! File-backed logging subscriber.
//!
//! [`LogWriter`] renders every event as one human-readable line and appends
//! it to the configured log file. This is the pipeline's logging
//! side-channel: it observes, it never drives control flow.
//!
//! ## Output format
//! ```text
//! [added] seq=0 worker=1
//! [started] seq=1 worker=1
//! [processed] seq=2 worker=1 record="привет"
//! [cancelled] seq=7 worker=1
//! [not-found] seq=9 worker=5
//! [pool-shutdown] seq=12
//! ```

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

use crate::events::Event;

use super::Subscribe;

/// Subscriber that appends one formatted line per event to a log file.
///
/// The file is created (truncated) at startup; failure to create it is a
/// fatal startup error surfaced by the caller.
pub struct LogWriter {
    writer: Mutex<BufWriter<File>>,
}

impl LogWriter {
    /// Creates the log file and wraps it in a writer.
    pub async fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

/// Renders an event as a single log line.
fn render(event: &Event) -> String {
    let mut line = format!("[{}] seq={}", event.kind.as_label(), event.seq);
    if let Some(worker) = event.worker {
        line.push_str(&format!(" worker={worker}"));
    }
    if let Some(record) = &event.record {
        line.push_str(&format!(" record={record:?}"));
    }
    if let Some(reason) = &event.reason {
        line.push_str(&format!(" reason={reason:?}"));
    }
    line
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, event: &Event) {
        let line = render(event);
        let mut writer = self.writer.lock().await;
        // Log writes are best-effort; a failing log must not stall the pool.
        let _ = writer.write_all(line.as_bytes()).await;
        let _ = writer.write_all(b"\n").await;
        let _ = writer.flush().await;
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_render_includes_fields() {
        let ev = Event::now(EventKind::RecordProcessed)
            .with_worker(2)
            .with_record("привет");
        let line = render(&ev);
        assert!(line.starts_with("[processed] seq="));
        assert!(line.contains("worker=2"));
        assert!(line.contains("record=\"привет\""));
    }

    #[test]
    fn test_render_omits_absent_fields() {
        let line = render(&Event::now(EventKind::PoolShutdown));
        assert!(line.starts_with("[pool-shutdown] seq="));
        assert!(!line.contains("worker="));
        assert!(!line.contains("record="));
    }

    #[tokio::test]
    async fn test_log_lines_land_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let log = LogWriter::create(&path).await.unwrap();

        log.on_event(&Event::now(EventKind::WorkerAdded).with_worker(1))
            .await;
        log.on_event(&Event::now(EventKind::WorkerDrained).with_worker(1))
            .await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[added]"));
        assert!(lines[1].starts_with("[drained]"));
    }
}
