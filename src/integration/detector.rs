//! Trait for object detection backends feeding the relay.

use crate::stabilizer::Detection;

/// Trait for object detection backends.
///
/// Implement this trait to connect any detection model or recorded stream
/// to the relay. Confidence filtering belongs to the implementation: the
/// relay treats every returned detection as confident.
///
/// # Example
///
/// ```ignore
/// use waste_relay_rs::{ClassLabels, Detection, DetectionSource};
///
/// struct MyDetector {
///     labels: ClassLabels,
///     // Your model and camera here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
///         // Grab a frame, run inference, drop weak detections
///         Ok(Some(vec![]))
///     }
///
///     fn label(&self, class_id: usize) -> Option<&str> {
///         self.labels.get(class_id)
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Detections for the next frame.
    ///
    /// Returns `Ok(None)` once the stream has ended. An empty vector is a
    /// frame with nothing confident in it.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error>;

    /// Class label for a class id, if the id is known.
    fn label(&self, class_id: usize) -> Option<&str>;
}

/// `classId -> label` lookup table of a detection model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    /// Create a label table; index `i` names class id `i`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the label for `class_id`, if the table has one.
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Number of labels in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Drop detections below `floor`, keeping input order.
pub fn apply_confidence_floor(detections: Vec<Detection>, floor: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.confidence >= floor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_labels_lookup() {
        let labels = ClassLabels::new(["organik", "non-organik"]);
        assert_eq!(labels.get(1), Some("non-organik"));
        assert_eq!(labels.get(2), None);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_confidence_floor_is_inclusive() {
        let dets = vec![
            Detection::new(0, 0.49),
            Detection::new(1, 0.5),
            Detection::new(2, 0.9),
        ];
        let kept: Vec<usize> = apply_confidence_floor(dets, 0.5)
            .iter()
            .map(|d| d.class_id)
            .collect();
        assert_eq!(kept, vec![1, 2]);
    }
}
