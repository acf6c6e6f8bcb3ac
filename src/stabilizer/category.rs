//! Coarse waste categories and the label mapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of the object in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Nothing recognised
    #[default]
    None,
    /// Organic waste
    Organic,
    /// Non-organic waste
    #[serde(rename = "Non-Organic")]
    NonOrganic,
}

impl Category {
    /// Wire name of the category, as stored in published records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::None => "None",
            Category::Organic => "Organic",
            Category::NonOrganic => "Non-Organic",
        }
    }

    /// Whether this is the "no detection" category.
    pub fn is_none(&self) -> bool {
        matches!(self, Category::None)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substrings used to recognise categories in class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelMarkers {
    /// Markers of the non-organic category, e.g. "non"
    pub negative_markers: Vec<String>,
    /// Markers of the organic category
    pub positive_markers: Vec<String>,
}

impl Default for LabelMarkers {
    fn default() -> Self {
        Self {
            negative_markers: vec!["non".into()],
            positive_markers: vec!["organic".into(), "organik".into()],
        }
    }
}

/// Maps raw class labels to a [`Category`].
///
/// Matching is a case-insensitive substring search. Negative markers are
/// always checked first: "non-organic" contains "organic" too.
#[derive(Debug, Clone)]
pub struct CategoryMapper {
    negative: Vec<String>,
    positive: Vec<String>,
}

impl CategoryMapper {
    /// Create a mapper from a marker set. Markers are matched lowercase.
    pub fn new(markers: &LabelMarkers) -> Self {
        let normalize = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect()
        };
        Self {
            negative: normalize(&markers.negative_markers),
            positive: normalize(&markers.positive_markers),
        }
    }

    /// Map a class label to a category; negative markers win over positive ones.
    pub fn map_label(&self, label: &str) -> Category {
        let label = label.to_lowercase();
        if self.negative.iter().any(|m| label.contains(m.as_str())) {
            Category::NonOrganic
        } else if self.positive.iter().any(|m| label.contains(m.as_str())) {
            Category::Organic
        } else {
            Category::None
        }
    }
}

impl Default for CategoryMapper {
    fn default() -> Self {
        Self::new(&LabelMarkers::default())
    }
}
