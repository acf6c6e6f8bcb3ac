//! Builder for creating Detection objects from raw model outputs.

use crate::stabilizer::{Detection, Rect};

/// Builder for creating `Detection` objects from various box formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    class_id: usize,
    confidence: f32,
    bbox: Option<Rect>,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class id.
    pub fn class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Some(Rect::from_tlbr(x1, y1, x2, y2));
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Some(Rect::from_xywh(cx, cy, w, h));
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection {
            class_id: self.class_id,
            confidence: self.confidence,
            bbox: self.bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new()
            .class_id(1)
            .tlbr(10.0, 20.0, 50.0, 80.0)
            .confidence(0.95)
            .build();

        assert_eq!(det.class_id, 1);
        assert_eq!(det.confidence, 0.95);
        assert_eq!(det.bbox, Some(Rect::new(10.0, 20.0, 40.0, 60.0)));
    }

    #[test]
    fn test_detection_builder_without_box() {
        let det = DetectionBuilder::new().confidence(0.6).build();
        assert_eq!(det, Detection::new(0, 0.6));
    }
}
