//! Line-atomic output sink.
//!
//! [`Sink`] appends one line per call to the output file. Multiple workers
//! write concurrently; the internal async mutex guarantees lines never
//! interleave partially. Each line is flushed before the lock is released so
//! the file is observable mid-run and complete once the pool's shutdown
//! barrier releases.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

/// Shared append-only sink over the output file.
pub struct Sink {
    writer: Mutex<BufWriter<File>>,
}

impl Sink {
    /// Creates the output file and wraps it in a writer.
    pub async fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Appends one line, atomically with respect to other callers.
    pub async fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_appends_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sink = Sink::create(&path).await.unwrap();

        sink.append_line("one").await.unwrap();
        sink.append_line("two").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_concurrent_writers_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sink = Arc::new(Sink::create(&path).await.unwrap());

        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let sink = Arc::clone(&sink);
            handles.push(tokio::spawn(async move {
                for n in 0..25 {
                    sink.append_line(&format!("worker-{worker}-line-{n}"))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: HashSet<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 8 * 25);
        for worker in 0..8 {
            for n in 0..25 {
                assert!(lines.contains(format!("worker-{worker}-line-{n}").as_str()));
            }
        }
    }
}
