//! Producer loop: feeds the shared queue from the record source.
//!
//! Reads one record at a time and pushes it onto the queue; a full queue
//! blocks the push, which is the system's only back-pressure. On exhaustion
//! the queue is closed exactly once. A read failure is written to the sink
//! as an error line (the original behavior of this pipeline) and terminates
//! the loop early; the caller still drives the pool to shutdown. No retries.

use std::path::Path;

use crate::core::queue::JobQueue;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::io::{RecordSource, Sink};

/// Reads the input file into the queue until exhaustion or failure.
pub(crate) async fn run(
    input: &Path,
    queue: &JobQueue,
    sink: &Sink,
    bus: &Bus,
) -> Result<(), RuntimeError> {
    let mut source = match RecordSource::open(input).await {
        Ok(source) => source,
        Err(err) => return fail(input, err, queue, sink, bus).await,
    };

    loop {
        match source.next_record().await {
            Ok(Some(record)) => {
                if queue.push(record).await.is_err() {
                    bus.publish(
                        Event::now(EventKind::SourceFailed)
                            .with_reason("record queue closed before input was exhausted"),
                    );
                    return Err(RuntimeError::QueueClosed);
                }
            }
            Ok(None) => break,
            Err(err) => return fail(input, err, queue, sink, bus).await,
        }
    }

    queue.close();
    bus.publish(Event::now(EventKind::SourceExhausted));
    Ok(())
}

/// Reports a source failure to the sink and the bus, closes the queue so
/// workers can drain what was accepted, and surfaces the terminal error.
async fn fail(
    input: &Path,
    err: std::io::Error,
    queue: &JobQueue,
    sink: &Sink,
    bus: &Bus,
) -> Result<(), RuntimeError> {
    let _ = sink.append_line(&format!("Error reading file: {err}")).await;
    bus.publish(Event::now(EventKind::SourceFailed).with_reason(err.to_string()));
    queue.close();
    Err(RuntimeError::Io {
        path: input.to_path_buf(),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_feeds_queue_and_closes_on_eof() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "привет").unwrap();
        writeln!(file, "мир").unwrap();
        drop(file);
        let sink = Sink::create(&dir.path().join("out.txt")).await.unwrap();

        let queue = JobQueue::bounded(8);
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        run(&input, &queue, &sink, &bus).await.unwrap();

        let reader = queue.reader();
        assert_eq!(reader.recv().await.unwrap(), "привет");
        assert_eq!(reader.recv().await.unwrap(), "мир");
        assert!(reader.recv().await.is_err(), "queue closed after EOF");
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::SourceExhausted);
    }

    #[tokio::test]
    async fn test_missing_input_reports_to_sink() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.txt");
        let sink = Sink::create(&out_path).await.unwrap();

        let queue = JobQueue::bounded(1);
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let err = run(&dir.path().join("absent.txt"), &queue, &sink, &bus)
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "runtime_io");

        let contents = std::fs::read_to_string(&out_path).unwrap();
        assert!(contents.starts_with("Error reading file:"));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::SourceFailed);
        assert!(queue.push("x".into()).await.is_err(), "queue closed on failure");
    }

    #[tokio::test]
    async fn test_push_after_external_close_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "строка\n").unwrap();
        let sink = Sink::create(&dir.path().join("out.txt")).await.unwrap();

        let queue = JobQueue::bounded(1);
        queue.close();
        let bus = Bus::new(16);

        let err = run(&input, &queue, &sink, &bus).await.unwrap_err();
        assert_eq!(err.as_label(), "runtime_queue_closed");
    }
}
