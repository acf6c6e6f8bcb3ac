use serde::{Deserialize, Serialize};

use crate::stabilizer::rect::Rect;

/// One model output for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Index into the detector's class label table
    pub class_id: usize,
    /// Detection confidence score in [0, 1]
    pub confidence: f32,
    /// Bounding box, when the detector reports one
    #[serde(default)]
    pub bbox: Option<Rect>,
}

impl Detection {
    /// Create a detection without a bounding box.
    pub fn new(class_id: usize, confidence: f32) -> Self {
        Self {
            class_id,
            confidence,
            bbox: None,
        }
    }

    /// Create a detection with a bounding box.
    pub fn with_bbox(class_id: usize, confidence: f32, bbox: Rect) -> Self {
        Self {
            class_id,
            confidence,
            bbox: Some(bbox),
        }
    }
}
