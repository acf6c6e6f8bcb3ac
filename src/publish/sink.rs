//! Sink abstraction and the publisher in front of it.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::publish::record::PublishRecord;

/// How a record is written under the sink path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the value at the path (`set`)
    #[default]
    Overwrite,
    /// Add a new child under the path (`push`)
    Append,
}

/// Remote store accepting best-effort writes.
///
/// Implement this trait to connect any key-value store to the relay.
/// Implementations should bound every call with a timeout so a slow store
/// cannot stall the detection loop.
pub trait Sink {
    /// Write `record` under `path` once. No retries.
    fn write(
        &mut self,
        path: &str,
        mode: WriteMode,
        record: &PublishRecord,
    ) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(
        &mut self,
        path: &str,
        mode: WriteMode,
        record: &PublishRecord,
    ) -> Result<(), SinkError> {
        (**self).write(path, mode, record)
    }
}

/// Pushes decided categories to a [`Sink`] under a fixed path.
pub struct Publisher<S: Sink> {
    sink: S,
    path: String,
    mode: WriteMode,
}

impl<S: Sink> Publisher<S> {
    /// Create a publisher writing to `path` on `sink` with `mode`.
    pub fn new(sink: S, path: impl Into<String>, mode: WriteMode) -> Self {
        Self {
            sink,
            path: path.into(),
            mode,
        }
    }

    /// Perform exactly one write attempt for `record`.
    ///
    /// The error is returned to the caller, which decides how to carry on;
    /// the record is dropped either way.
    pub fn publish(&mut self, record: PublishRecord) -> Result<(), SinkError> {
        match self.sink.write(&self.path, self.mode, &record) {
            Ok(()) => {
                info!(
                    "published {} ({:.2}) to {} [{:?}]",
                    record.category, record.confidence, self.path, self.mode
                );
                Ok(())
            }
            Err(err) => {
                warn!("publish of {} to {} failed: {err}", record.category, self.path);
                Err(err)
            }
        }
    }

    /// Get the database path records are written under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the write mode.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Get a reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::MemorySink;
    use crate::stabilizer::Category;

    #[test]
    fn test_publish_writes_once() {
        let mut publisher = Publisher::new(MemorySink::new(), "deteksi", WriteMode::Append);
        let record = PublishRecord::new(Category::Organic, "organik", 0.9, 1);
        publisher.publish(record.clone()).unwrap();

        let writes = publisher.sink().writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].path, "deteksi");
        assert_eq!(writes[0].mode, WriteMode::Append);
        assert_eq!(writes[0].record, record);
    }

    #[test]
    fn test_publish_failure_is_returned_without_retry() {
        let mut sink = MemorySink::new();
        sink.fail_next(1);
        let mut publisher = Publisher::new(sink, "deteksi", WriteMode::Overwrite);

        let record = PublishRecord::new(Category::NonOrganic, "non", 0.7, 1);
        assert!(publisher.publish(record).is_err());
        assert_eq!(publisher.sink().attempts(), 1);
        assert!(publisher.sink().writes().is_empty());
    }

    #[test]
    fn test_write_mode_config_names() {
        assert_eq!(
            serde_json::from_str::<WriteMode>("\"append\"").unwrap(),
            WriteMode::Append
        );
        assert_eq!(
            serde_json::from_str::<WriteMode>("\"overwrite\"").unwrap(),
            WriteMode::Overwrite
        );
        assert!(serde_json::from_str::<WriteMode>("\"upsert\"").is_err());
    }
}
