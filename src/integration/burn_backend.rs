//! Burn inference backend for waste detection.
//!
//! This module provides a `BurnDetector` that implements `DetectionSource`
//! by pulling frames from a [`FrameFeed`] and running a detection model
//! built with the Burn framework on each of them.
//!
//! # Example
//!
//! ```ignore
//! use waste_relay_rs::integration::{BurnDetector, BurnModel, ClassLabels};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("best.bin");
//! let labels = ClassLabels::new(["organik", "non-organik"]);
//! let detector = BurnDetector::new(model, Default::default(), labels, camera)
//!     .with_conf_threshold(0.5);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::{ClassLabels, DetectionBuilder, DetectionSource};
use crate::stabilizer::Detection;

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Input image has invalid dimensions.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (u32, u32, u32),
        got: (u32, u32, u32),
    },
    /// Preprocessing failed.
    #[error("preprocessing error: {0}")]
    PreprocessingError(String),
    /// The frame feed failed.
    #[error("frame feed error: {0}")]
    FeedError(String),
}

/// One RGB frame in planar CHW layout, `u8` per channel.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Source of camera frames for the detector.
pub trait FrameFeed {
    /// Next frame, or `None` when the feed is closed.
    fn next_image(&mut self) -> Result<Option<FrameImage>, String>;
}

/// Raw detection output from the model.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID into the detector's label table
    pub class_id: usize,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor of shape [batch, channels, height, width].
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640) // Default YOLO input size
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true // Most YOLO variants use XYWH
    }
}

/// Burn-based waste detector implementing `DetectionSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>, F: FrameFeed> {
    model: M,
    device: B::Device,
    labels: ClassLabels,
    feed: F,
    conf_threshold: f32,
}

impl<B: Backend, M: BurnModel<B>, F: FrameFeed> BurnDetector<B, M, F> {
    /// Create a new Burn detector with the given model, device, label table and feed.
    pub fn new(model: M, device: B::Device, labels: ClassLabels, feed: F) -> Self {
        Self {
            model,
            device,
            labels,
            feed,
            conf_threshold: 0.5,
        }
    }

    /// Set the confidence floor for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Convert a frame to a normalized [1, C, H, W] tensor.
    pub fn preprocess(&self, frame: &FrameImage) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let (width, height) = (frame.width, frame.height);
        let expected_len = (width * height * channels) as usize;

        if frame.data.len() != expected_len {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, height, width),
                got: (
                    channels,
                    height,
                    frame.data.len() as u32 / (height * channels).max(1),
                ),
            });
        }

        if height != target_h || width != target_w {
            return Err(BurnDetectorError::PreprocessingError(format!(
                "frame size {}x{} doesn't match model size {}x{}",
                width, height, target_w, target_h
            )));
        }

        let data: Vec<f32> = frame.data.iter().map(|&x| x as f32 / 255.0).collect();
        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            channels as usize,
            height as usize,
            width as usize,
        ]);

        Ok(tensor)
    }

    /// Convert raw model outputs to detections above the confidence floor.
    fn postprocess(&self, raw_detections: Vec<RawDetection>) -> Vec<Detection> {
        raw_detections
            .into_iter()
            .filter(|d| d.score >= self.conf_threshold)
            .map(|d| {
                let builder = DetectionBuilder::new()
                    .class_id(d.class_id)
                    .confidence(d.score);
                let builder = if self.model.bbox_is_xywh() {
                    builder.xywh(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                } else {
                    builder.tlbr(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                };
                builder.build()
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>, F: FrameFeed> DetectionSource for BurnDetector<B, M, F> {
    type Error = BurnDetectorError;

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
        let Some(frame) = self
            .feed
            .next_image()
            .map_err(BurnDetectorError::FeedError)?
        else {
            return Ok(None);
        };
        let tensor = self.preprocess(&frame)?;
        let raw_detections = self.model.forward(tensor);
        Ok(Some(self.postprocess(raw_detections)))
    }

    fn label(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id)
    }
}
