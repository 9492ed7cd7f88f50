//! Tooth chart models: surfaces, findings and per-tooth state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::plan::TreatmentItem;

/// Tooth identifier in FDI two-digit notation (e.g., 11, 36, 85).
pub type ToothId = u8;

/// An anatomical face of a tooth, plus the root slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Buccal,
    Lingual,
    Occlusal,
    Distal,
    Mesial,
    Root,
}

impl Surface {
    /// Every surface slot, root last.
    pub const ALL: [Surface; 6] = [
        Surface::Buccal,
        Surface::Lingual,
        Surface::Occlusal,
        Surface::Distal,
        Surface::Mesial,
        Surface::Root,
    ];

    /// The coronal surfaces (everything except the root).
    pub const CORONAL: [Surface; 5] = [
        Surface::Buccal,
        Surface::Lingual,
        Surface::Occlusal,
        Surface::Distal,
        Surface::Mesial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Buccal => "buccal",
            Surface::Lingual => "lingual",
            Surface::Occlusal => "occlusal",
            Surface::Distal => "distal",
            Surface::Mesial => "mesial",
            Surface::Root => "root",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Surface::Root)
    }
}

/// Where a finding or treatment item sits on a tooth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum ChartSite {
    /// A concrete surface slot
    Surface(Surface),
    /// The entire tooth
    Whole,
}

impl ChartSite {
    /// The concrete coronal surface, if this site is one.
    pub fn coronal_surface(&self) -> Option<Surface> {
        match self {
            ChartSite::Surface(surface) if !surface.is_root() => Some(*surface),
            _ => None,
        }
    }

    /// Root slot or the whole-tooth sentinel.
    pub fn is_root_or_whole(&self) -> bool {
        matches!(self, ChartSite::Whole | ChartSite::Surface(Surface::Root))
    }
}

impl fmt::Display for ChartSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSite::Surface(surface) => f.write_str(surface.as_str()),
            ChartSite::Whole => f.write_str("whole"),
        }
    }
}

/// Error parsing a chart site name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown chart site: {0}")]
pub struct ParseSiteError(pub String);

impl FromStr for ChartSite {
    type Err = ParseSiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let site = match s.trim().to_lowercase().as_str() {
            "buccal" => ChartSite::Surface(Surface::Buccal),
            "lingual" => ChartSite::Surface(Surface::Lingual),
            "occlusal" => ChartSite::Surface(Surface::Occlusal),
            "distal" => ChartSite::Surface(Surface::Distal),
            "mesial" => ChartSite::Surface(Surface::Mesial),
            "root" => ChartSite::Surface(Surface::Root),
            "whole" => ChartSite::Whole,
            _ => return Err(ParseSiteError(s.to_string())),
        };
        Ok(site)
    }
}

impl From<Surface> for ChartSite {
    fn from(surface: Surface) -> Self {
        ChartSite::Surface(surface)
    }
}

impl From<ChartSite> for String {
    fn from(site: ChartSite) -> Self {
        site.to_string()
    }
}

impl TryFrom<String> for ChartSite {
    type Error = ParseSiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An unconfirmed diagnosis awaiting assignment to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicalFinding {
    /// Unique finding ID
    pub id: String,
    /// Tooth the finding was recorded on
    pub tooth_id: ToothId,
    /// Surface or whole tooth
    pub site: ChartSite,
    /// Catalog id of the diagnosed condition
    pub condition: String,
}

impl ClinicalFinding {
    /// Create a finding with a fresh id.
    pub fn new(tooth_id: ToothId, site: ChartSite, condition: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tooth_id,
            site,
            condition: condition.into(),
        }
    }

    /// Whether this finding records the same diagnosis at the same place.
    pub fn matches(&self, tooth_id: ToothId, site: ChartSite, condition: &str) -> bool {
        self.tooth_id == tooth_id && self.site == site && self.condition == condition
    }
}

/// Charted state of a single tooth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToothState {
    /// Items currently occupying each surface slot
    pub surfaces: BTreeMap<Surface, Vec<TreatmentItem>>,
    /// Items applying to the entire tooth
    pub whole: Vec<TreatmentItem>,
    /// Pending findings, oldest first
    pub findings: Vec<ClinicalFinding>,
}

impl Default for ToothState {
    fn default() -> Self {
        Self::new()
    }
}

impl ToothState {
    /// A tooth with every slot empty.
    pub fn new() -> Self {
        Self {
            surfaces: Surface::ALL.iter().map(|s| (*s, Vec::new())).collect(),
            whole: Vec::new(),
            findings: Vec::new(),
        }
    }

    /// Items on a surface slot.
    pub fn surface(&self, surface: Surface) -> &[TreatmentItem] {
        self.surfaces
            .get(&surface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether nothing is charted on the tooth (findings are not chart state).
    pub fn is_uncharted(&self) -> bool {
        self.whole.is_empty() && self.surfaces.values().all(Vec::is_empty)
    }

    /// Replace the item with the same id in a surface slot, or append it.
    pub fn upsert_surface(&mut self, surface: Surface, item: TreatmentItem) {
        upsert(self.surfaces.entry(surface).or_default(), item);
    }

    /// Replace the item with the same id in the whole-tooth list, or append it.
    pub fn upsert_whole(&mut self, item: TreatmentItem) {
        upsert(&mut self.whole, item);
    }

    /// Set every coronal surface to exactly `[item]`.
    pub fn fill_coronal(&mut self, item: &TreatmentItem) {
        for surface in Surface::CORONAL {
            self.surfaces.insert(surface, vec![item.clone()]);
        }
    }

    /// Empty every coronal surface. The root slot is kept.
    pub fn clear_coronal(&mut self) {
        for surface in Surface::CORONAL {
            self.surfaces.insert(surface, Vec::new());
        }
    }
}

fn upsert(items: &mut Vec<TreatmentItem>, item: TreatmentItem) {
    match items.iter().position(|existing| existing.id == item.id) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreatmentStatus;

    fn item(id: &str, surface: Surface) -> TreatmentItem {
        TreatmentItem {
            id: id.into(),
            treatment_id: "filling".into(),
            tooth_id: 16,
            site: ChartSite::Surface(surface),
            status: TreatmentStatus::Completed,
            session_id: "session-1".into(),
        }
    }

    #[test]
    fn test_new_tooth_has_every_slot() {
        let tooth = ToothState::new();
        assert_eq!(tooth.surfaces.len(), 6);
        assert!(tooth.is_uncharted());
        assert!(tooth.findings.is_empty());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut tooth = ToothState::new();
        tooth.upsert_surface(Surface::Occlusal, item("a", Surface::Occlusal));
        tooth.upsert_surface(Surface::Occlusal, item("b", Surface::Occlusal));

        let mut updated = item("a", Surface::Occlusal);
        updated.status = TreatmentStatus::Proposed;
        tooth.upsert_surface(Surface::Occlusal, updated);

        let occlusal = tooth.surface(Surface::Occlusal);
        assert_eq!(occlusal.len(), 2);
        assert_eq!(occlusal[0].id, "a");
        assert_eq!(occlusal[0].status, TreatmentStatus::Proposed);
        assert_eq!(occlusal[1].id, "b");
    }

    #[test]
    fn test_clear_coronal_keeps_root() {
        let mut tooth = ToothState::new();
        tooth.upsert_surface(Surface::Root, item("endo", Surface::Root));
        tooth.fill_coronal(&item("crown", Surface::Buccal));
        tooth.clear_coronal();

        assert!(Surface::CORONAL.iter().all(|s| tooth.surface(*s).is_empty()));
        assert_eq!(tooth.surface(Surface::Root).len(), 1);
    }

    #[test]
    fn test_chart_site_round_trips_through_strings() {
        let site: ChartSite = "Mesial".parse().unwrap();
        assert_eq!(site, ChartSite::Surface(Surface::Mesial));
        assert_eq!(ChartSite::Whole.to_string(), "whole");
        assert!("palatal".parse::<ChartSite>().is_err());

        let json = serde_json::to_string(&ChartSite::Whole).unwrap();
        assert_eq!(json, "\"whole\"");
    }

    #[test]
    fn test_finding_matches_triple() {
        let finding = ClinicalFinding::new(21, ChartSite::Surface(Surface::Distal), "caries");
        assert!(finding.matches(21, ChartSite::Surface(Surface::Distal), "caries"));
        assert!(!finding.matches(21, ChartSite::Whole, "caries"));
        assert_eq!(finding.id.len(), 36);
    }
}
