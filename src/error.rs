//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration. Fatal at startup, before the relay loop begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("confidence_floor must be within [0, 1], got {0}")]
    ConfidenceFloor(f32),
    #[error("debounce_window_secs must be a finite, non-negative number, got {0}")]
    DebounceWindow(f64),
    #[error("request_timeout_secs must be a finite, positive number, got {0}")]
    RequestTimeout(f64),
    #[error("sink_path must not be empty")]
    EmptySinkPath,
    #[error("invalid database_url {url:?}: {reason}")]
    DatabaseUrl { url: String, reason: String },
}

/// A write the sink rejected or never acknowledged.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sink rejected write to {path}: HTTP {status}")]
    Rejected { path: String, status: u16 },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a detection source. Ends the relay loop.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read detections: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid frame timestamp {t} on line {line}")]
    Timestamp { line: usize, t: f64 },
    #[error("detector failed: {0}")]
    Detector(String),
}
