//! Treatment catalog models.

use serde::{Deserialize, Serialize};

/// Anatomical scope a treatment or condition is charted on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    /// A single crown surface (buccal, lingual, occlusal, distal, mesial)
    Surface,
    /// The root slot only
    Root,
    /// The entire tooth
    WholeTooth,
}

/// Grouping used by the diagnosis toolbar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentCategory {
    Pathology,
    Operative,
    Endodontics,
    Rehabilitation,
    Surgery,
    Other,
}

impl TreatmentCategory {
    /// All categories in display order.
    pub const ALL: [TreatmentCategory; 6] = [
        TreatmentCategory::Pathology,
        TreatmentCategory::Operative,
        TreatmentCategory::Endodontics,
        TreatmentCategory::Rehabilitation,
        TreatmentCategory::Surgery,
        TreatmentCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentCategory::Pathology => "pathology",
            TreatmentCategory::Operative => "operative",
            TreatmentCategory::Endodontics => "endodontics",
            TreatmentCategory::Rehabilitation => "rehabilitation",
            TreatmentCategory::Surgery => "surgery",
            TreatmentCategory::Other => "other",
        }
    }
}

/// A single condition or treatment the operator can chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentDefinition {
    /// Unique code (e.g., "caries", "crown", "extraction")
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Toolbar category
    pub category: TreatmentCategory,
    /// Price in minor currency units
    pub price: u64,
    /// Where the treatment is charted
    pub applies_to: AppliesTo,
}

impl TreatmentDefinition {
    /// Create a new definition.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: TreatmentCategory,
        price: u64,
        applies_to: AppliesTo,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            price,
            applies_to,
        }
    }

    /// Whether this treatment is charted per surface.
    pub fn is_surface_scoped(&self) -> bool {
        self.applies_to == AppliesTo::Surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_to_serializes_snake_case() {
        let json = serde_json::to_string(&AppliesTo::WholeTooth).unwrap();
        assert_eq!(json, "\"whole_tooth\"");
    }

    #[test]
    fn test_category_order_is_stable() {
        assert_eq!(TreatmentCategory::ALL[0], TreatmentCategory::Pathology);
        assert_eq!(TreatmentCategory::ALL[5].as_str(), "other");
    }
}
