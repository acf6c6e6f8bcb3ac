use serde::{Deserialize, Serialize};

/// Bounding box of a detection, in image pixel coordinates.
///
/// Stored as top-left corner plus size. Detectors usually report either
/// TLBR (x1, y1, x2, y2) or XYWH (center x, center y, width, height);
/// both have constructors here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from corner coordinates. Corners may be given in any order.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// Create a Rect from center coordinates and dimensions.
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Corner coordinates truncated to whole pixels, ready for drawing.
    pub fn to_pixel_tlbr(&self) -> [i32; 4] {
        let [x1, y1, x2, y2] = self.to_tlbr();
        [x1 as i32, y1 as i32, x2 as i32, y2 as i32]
    }

    /// Where a caption for this box should be anchored: just above the
    /// top-left corner, `offset` pixels up.
    pub fn caption_anchor(&self, offset: i32) -> (i32, i32) {
        let [x1, y1, _, _] = self.to_pixel_tlbr();
        (x1, y1 - offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_from_tlbr_swapped_corners() {
        let rect = Rect::from_tlbr(40.0, 60.0, 10.0, 20.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_from_xywh() {
        let rect = Rect::from_xywh(25.0, 40.0, 30.0, 40.0);
        assert!((rect.x - 10.0).abs() < 1e-6);
        assert!((rect.y - 20.0).abs() < 1e-6);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 40.0);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_pixel_snapping() {
        let rect = Rect::from_tlbr(10.7, 20.2, 40.9, 60.5);
        assert_eq!(rect.to_pixel_tlbr(), [10, 20, 40, 60]);
        assert_eq!(rect.caption_anchor(10), (10, 10));
    }
}
