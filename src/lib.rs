//! Turns per-frame waste detections into stabilized, rate-limited category
//! updates published to a remote key-value store.
//!
//! Per frame the relay picks the most confident detection, maps its class
//! label to a [`Category`], lets the [`Stabilizer`] decide whether the
//! category is worth reporting, and hands a [`PublishRecord`] to the
//! [`Publisher`]. Sink failures never stop the loop.

pub mod config;
pub mod error;
pub mod integration;
pub mod publish;
pub mod stabilizer;

pub use config::{RelayConfig, load_config};
pub use error::{ConfigError, SinkError, SourceError};
pub use integration::{
    ClassLabels, DetectionBuilder, DetectionSource, PublishOutcome, RelayPipeline, RelayStats,
    ReplaySource, StopHandle, TickReport,
};
pub use publish::{FirebaseSink, MemorySink, PublishRecord, Publisher, Sink, WriteMode};
pub use stabilizer::{
    Category, CategoryMapper, Clock, Decision, Detection, LabelMarkers, ManualClock,
    PublishReason, Rect, Stabilizer, StabilizerConfig, StabilizerState, SystemClock, select_best,
};
