//! Integration module connecting detection backends and sinks to the relay.
//!
//! This module provides the `DetectionSource` trait, a replay source for
//! recorded detections, and the `RelayPipeline` polling loop.

mod builder;
mod detector;
mod pipeline;
mod replay;

pub use builder::DetectionBuilder;
pub use detector::{ClassLabels, DetectionSource, apply_confidence_floor};
pub use pipeline::{PublishOutcome, RelayPipeline, RelayStats, StopHandle, TickReport};
pub use replay::ReplaySource;

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{
    BurnDetector, BurnDetectorError, BurnModel, FrameFeed, FrameImage, RawDetection,
};
