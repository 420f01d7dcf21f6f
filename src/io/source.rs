//! Line-by-line record source.
//!
//! Reads newline-separated records from the input file, one at a time. No
//! state beyond the read cursor; end of file and read errors are the only
//! terminal conditions.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Sequential reader producing one record per input line.
pub struct RecordSource {
    lines: Lines<BufReader<File>>,
}

impl RecordSource {
    /// Opens the input file for reading.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Returns the next record, or `None` at end of input.
    pub async fn next_record(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}
