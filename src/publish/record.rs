use serde::{Deserialize, Serialize};

use crate::stabilizer::Category;

/// Payload written to the sink for one publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub category: Category,
    /// Raw class label of the winning detection
    pub label: String,
    /// Confidence, rounded to two decimals
    pub confidence: f32,
    /// Unix seconds
    pub timestamp: i64,
}

impl PublishRecord {
    /// Build a record, rounding `confidence` to two decimals.
    pub fn new(
        category: Category,
        label: impl Into<String>,
        confidence: f32,
        timestamp: i64,
    ) -> Self {
        Self {
            category,
            label: label.into(),
            confidence: (confidence * 100.0).round() / 100.0,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_rounded() {
        let record = PublishRecord::new(Category::Organic, "organik", 0.8765, 10);
        assert_eq!(record.confidence, 0.88);
    }

    #[test]
    fn test_json_layout() {
        let record = PublishRecord::new(Category::NonOrganic, "non-organik", 0.5, 1_718_000_000);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "category": "Non-Organic",
                "label": "non-organik",
                "confidence": 0.5,
                "timestamp": 1_718_000_000i64,
            })
        );
    }
}
