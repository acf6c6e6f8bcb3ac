//! In-process sink for dry runs and tests.

use std::collections::HashMap;

use crate::error::SinkError;
use crate::publish::record::PublishRecord;
use crate::publish::sink::{Sink, WriteMode};

/// A write accepted by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct SinkWrite {
    pub path: String,
    pub mode: WriteMode,
    pub record: PublishRecord,
}

/// Sink that keeps everything in memory and can be scripted to fail.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Vec<SinkWrite>,
    tree: HashMap<String, Vec<PublishRecord>>,
    attempts: usize,
    failures_left: usize,
}

impl MemorySink {
    /// Create an empty sink that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` write attempts fail.
    pub fn fail_next(&mut self, n: usize) {
        self.failures_left = n;
    }

    /// Successful writes, oldest first.
    pub fn writes(&self) -> &[SinkWrite] {
        &self.writes
    }

    /// Number of write attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Records stored under `path`: one for overwrite, all children for append.
    pub fn stored(&self, path: &str) -> &[PublishRecord] {
        self.tree.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Sink for MemorySink {
    fn write(
        &mut self,
        path: &str,
        mode: WriteMode,
        record: &PublishRecord,
    ) -> Result<(), SinkError> {
        self.attempts += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(SinkError::Unavailable(format!(
                "scripted failure on attempt {}",
                self.attempts
            )));
        }

        let entry = self.tree.entry(path.to_string()).or_default();
        match mode {
            WriteMode::Overwrite => {
                entry.clear();
                entry.push(record.clone());
            }
            WriteMode::Append => entry.push(record.clone()),
        }

        self.writes.push(SinkWrite {
            path: path.to_string(),
            mode,
            record: record.clone(),
        });
        Ok(())
    }
}
