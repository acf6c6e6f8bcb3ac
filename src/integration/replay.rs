//! Detection source replaying recorded frames from a JSON Lines stream.
//!
//! Each non-empty line is either a label table or a frame:
//!
//! ```text
//! {"labels": ["organik", "non-organik"]}
//! {"t": 0.0, "detections": [{"class_id": 0, "confidence": 0.91}]}
//! {"t": 0.5, "detections": []}
//! ```
//!
//! A label line replaces the current table. When a [`ManualClock`] is
//! attached, frames carrying `t` (seconds) move the clock to that time
//! before they are returned. A `t` that is negative, NaN or too large for a
//! `Duration` is an error.

use std::io::BufRead;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::error::SourceError;
use crate::integration::detector::{ClassLabels, DetectionSource, apply_confidence_floor};
use crate::stabilizer::{Detection, ManualClock};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Labels {
        labels: Vec<String>,
    },
    Frame {
        #[serde(default)]
        t: Option<f64>,
        detections: Vec<Detection>,
    },
}

/// Replays recorded detections, applying a confidence floor.
pub struct ReplaySource<R: BufRead> {
    reader: R,
    labels: ClassLabels,
    confidence_floor: f32,
    clock: Option<ManualClock>,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> ReplaySource<R> {
    /// Create a replay source over `reader`, starting with the `labels` table.
    pub fn new(reader: R, labels: ClassLabels, confidence_floor: f32) -> Self {
        Self {
            reader,
            labels,
            confidence_floor,
            clock: None,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Drive `clock` from the frame timestamps.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Get the current label table.
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }
}

impl<R: BufRead> DetectionSource for ReplaySource<R> {
    type Error = SourceError;

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let parsed: ReplayLine =
                serde_json::from_str(line).map_err(|source| SourceError::Malformed {
                    line: self.line_no,
                    source,
                })?;

            match parsed {
                ReplayLine::Labels { labels } => {
                    debug!("replay label table with {} classes", labels.len());
                    self.labels = ClassLabels::new(labels);
                }
                ReplayLine::Frame { t, detections } => {
                    if let Some(t) = t {
                        let at = Duration::try_from_secs_f64(t).map_err(|_| {
                            SourceError::Timestamp {
                                line: self.line_no,
                                t,
                            }
                        })?;
                        if let Some(clock) = &self.clock {
                            clock.set(at);
                        }
                    }
                    return Ok(Some(apply_confidence_floor(
                        detections,
                        self.confidence_floor,
                    )));
                }
            }
        }
    }

    fn label(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id)
    }
}
