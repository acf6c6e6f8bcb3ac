//! Best-pick selection over one frame's detections.

use crate::stabilizer::detection::Detection;

/// Return the detection with the highest confidence.
///
/// Ties keep the earliest detection in input order. Returns `None` for an
/// empty frame. NaN confidences are skipped. No confidence floor is applied here; the detection source is
/// expected to have dropped weak detections already.
pub fn select_best(detections: &[Detection]) -> Option<&Detection> {
    let mut best: Option<&Detection> = None;
    for det in detections {
        if det.confidence.is_nan() {
            continue;
        }
        match best {
            Some(current) if det.confidence <= current.confidence => {}
            _ => best = Some(det),
        }
    }
    best
}
