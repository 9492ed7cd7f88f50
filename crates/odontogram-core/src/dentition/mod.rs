//! Dentition engine: permanent and deciduous tooth charts.
//!
//! Both charts are persistent values. Every operation returns a new engine and
//! shares untouched teeth with the previous one through `Arc`, so snapshots a
//! caller kept earlier never change.

mod placement;

pub use placement::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::TreatmentCatalog;
use crate::models::{ChartSite, ClinicalFinding, ToothId, ToothState};

/// Permanent teeth, FDI quadrants 1-4.
pub const PERMANENT_TEETH: [ToothId; 32] = [
    18, 17, 16, 15, 14, 13, 12, 11, 21, 22, 23, 24, 25, 26, 27, 28, //
    48, 47, 46, 45, 44, 43, 42, 41, 31, 32, 33, 34, 35, 36, 37, 38,
];

/// Deciduous teeth, FDI quadrants 5-8.
pub const DECIDUOUS_TEETH: [ToothId; 20] = [
    55, 54, 53, 52, 51, 61, 62, 63, 64, 65, //
    85, 84, 83, 82, 81, 71, 72, 73, 74, 75,
];

/// Which set of teeth a chart covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DentitionKind {
    Permanent,
    Deciduous,
}

impl DentitionKind {
    /// The fixed tooth-id universe of this dentition.
    pub fn teeth(&self) -> &'static [ToothId] {
        match self {
            DentitionKind::Permanent => &PERMANENT_TEETH,
            DentitionKind::Deciduous => &DECIDUOUS_TEETH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DentitionKind::Permanent => "permanent",
            DentitionKind::Deciduous => "deciduous",
        }
    }
}

/// Resolve which dentition owns a tooth id.
pub fn which_dentition(tooth_id: ToothId) -> Option<DentitionKind> {
    if PERMANENT_TEETH.contains(&tooth_id) {
        Some(DentitionKind::Permanent)
    } else if DECIDUOUS_TEETH.contains(&tooth_id) {
        Some(DentitionKind::Deciduous)
    } else {
        None
    }
}

/// The charted state of every tooth in one dentition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dentition {
    pub kind: DentitionKind,
    teeth: BTreeMap<ToothId, Arc<ToothState>>,
}

impl Dentition {
    /// A chart with every tooth of the universe empty.
    pub fn new(kind: DentitionKind) -> Self {
        let blank = Arc::new(ToothState::new());
        let teeth = kind
            .teeth()
            .iter()
            .map(|id| (*id, Arc::clone(&blank)))
            .collect();
        Self { kind, teeth }
    }

    /// State of a tooth in this dentition.
    pub fn tooth(&self, tooth_id: ToothId) -> Option<&ToothState> {
        self.teeth.get(&tooth_id).map(Arc::as_ref)
    }

    /// Teeth in ascending id order.
    pub fn teeth(&self) -> impl Iterator<Item = (ToothId, &ToothState)> + '_ {
        self.teeth.iter().map(|(id, state)| (*id, state.as_ref()))
    }

    /// Whether two dentitions share the same allocation for a tooth.
    pub fn shares_tooth_with(&self, other: &Dentition, tooth_id: ToothId) -> bool {
        match (self.teeth.get(&tooth_id), other.teeth.get(&tooth_id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Mutate one tooth in place, copying it first if it is shared.
    fn edit_tooth<R>(&mut self, tooth_id: ToothId, edit: impl FnOnce(&mut ToothState) -> R) -> Option<R> {
        self.teeth
            .get_mut(&tooth_id)
            .map(|state| edit(Arc::make_mut(state)))
    }
}

/// The permanent and deciduous charts of one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DentitionEngine {
    permanent: Arc<Dentition>,
    deciduous: Arc<Dentition>,
}

impl Default for DentitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DentitionEngine {
    /// Two blank charts.
    pub fn new() -> Self {
        Self {
            permanent: Arc::new(Dentition::new(DentitionKind::Permanent)),
            deciduous: Arc::new(Dentition::new(DentitionKind::Deciduous)),
        }
    }

    pub fn permanent(&self) -> &Dentition {
        &self.permanent
    }

    pub fn deciduous(&self) -> &Dentition {
        &self.deciduous
    }

    pub fn dentition(&self, kind: DentitionKind) -> &Dentition {
        match kind {
            DentitionKind::Permanent => &self.permanent,
            DentitionKind::Deciduous => &self.deciduous,
        }
    }

    /// State of any tooth, permanent or deciduous.
    pub fn tooth(&self, tooth_id: ToothId) -> Option<&ToothState> {
        which_dentition(tooth_id).and_then(|kind| self.dentition(kind).tooth(tooth_id))
    }

    /// Record a diagnosis on a tooth.
    ///
    /// Unknown conditions and unknown teeth leave the engine unchanged. An
    /// identical `(tooth, site, condition)` finding is never recorded twice.
    pub fn add_finding(
        &self,
        catalog: &TreatmentCatalog,
        tooth_id: ToothId,
        site: ChartSite,
        condition: &str,
    ) -> Self {
        if catalog.lookup(condition).is_none() {
            tracing::warn!(tooth_id, condition, "finding ignored: unknown condition");
            return self.clone();
        }

        let mut next = self.clone();
        let recorded = next.edit_tooth(tooth_id, |tooth| {
            if tooth.findings.iter().any(|f| f.matches(tooth_id, site, condition)) {
                return false;
            }
            tooth.findings.push(ClinicalFinding::new(tooth_id, site, condition));
            true
        });

        match recorded {
            None => {
                tracing::warn!(tooth_id, condition, "finding ignored: unknown tooth");
                self.clone()
            }
            Some(false) => {
                tracing::debug!(tooth_id, %site, condition, "duplicate finding collapsed");
                self.clone()
            }
            Some(true) => {
                tracing::debug!(tooth_id, %site, condition, "finding recorded");
                next
            }
        }
    }

    /// Remove a finding from whichever tooth holds it.
    pub fn remove_finding(&self, finding_id: &str) -> Self {
        let Some(finding) = self.find_finding(finding_id) else {
            tracing::warn!(finding_id, "finding removal ignored: not found");
            return self.clone();
        };

        let tooth_id = finding.tooth_id;
        let mut next = self.clone();
        next.edit_tooth(tooth_id, |tooth| tooth.findings.retain(|f| f.id != finding_id));
        next
    }

    /// Locate a pending finding by id.
    pub fn find_finding(&self, finding_id: &str) -> Option<&ClinicalFinding> {
        self.findings().find(|f| f.id == finding_id)
    }

    /// Every pending finding: permanent teeth first, then deciduous.
    pub fn pending_findings(&self) -> Vec<&ClinicalFinding> {
        self.findings().collect()
    }

    fn findings(&self) -> impl Iterator<Item = &ClinicalFinding> + '_ {
        self.permanent
            .teeth()
            .chain(self.deciduous.teeth())
            .flat_map(|(_, tooth)| tooth.findings.iter())
    }

    /// Mutate one tooth of the owning dentition, copying only that path.
    pub(crate) fn edit_tooth<R>(
        &mut self,
        tooth_id: ToothId,
        edit: impl FnOnce(&mut ToothState) -> R,
    ) -> Option<R> {
        let dentition = match which_dentition(tooth_id)? {
            DentitionKind::Permanent => &mut self.permanent,
            DentitionKind::Deciduous => &mut self.deciduous,
        };
        Arc::make_mut(dentition).edit_tooth(tooth_id, edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Surface;

    const OCCLUSAL: ChartSite = ChartSite::Surface(Surface::Occlusal);

    #[test]
    fn test_which_dentition() {
        assert_eq!(which_dentition(11), Some(DentitionKind::Permanent));
        assert_eq!(which_dentition(48), Some(DentitionKind::Permanent));
        assert_eq!(which_dentition(55), Some(DentitionKind::Deciduous));
        assert_eq!(which_dentition(85), Some(DentitionKind::Deciduous));
        assert_eq!(which_dentition(19), None);
        assert_eq!(which_dentition(56), None);
    }

    #[test]
    fn test_universes_do_not_overlap() {
        for id in PERMANENT_TEETH {
            assert!(!DECIDUOUS_TEETH.contains(&id));
        }
        assert_eq!(Dentition::new(DentitionKind::Deciduous).teeth().count(), 20);
    }

    #[test]
    fn test_add_finding_is_idempotent() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new()
            .add_finding(&catalog, 16, OCCLUSAL, "caries")
            .add_finding(&catalog, 16, OCCLUSAL, "caries");

        assert_eq!(engine.pending_findings().len(), 1);
        assert_eq!(engine.tooth(16).unwrap().findings.len(), 1);
    }

    #[test]
    fn test_add_finding_distinct_sites_are_kept() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new()
            .add_finding(&catalog, 16, OCCLUSAL, "caries")
            .add_finding(&catalog, 16, ChartSite::Surface(Surface::Mesial), "caries");

        assert_eq!(engine.tooth(16).unwrap().findings.len(), 2);
    }

    #[test]
    fn test_add_finding_unknown_condition_is_noop() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new();
        let next = engine.add_finding(&catalog, 16, OCCLUSAL, "stale-id");
        assert_eq!(next, engine);
    }

    #[test]
    fn test_add_finding_unknown_tooth_is_noop() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new();
        let next = engine.add_finding(&catalog, 99, OCCLUSAL, "caries");
        assert_eq!(next, engine);
    }

    #[test]
    fn test_remove_finding_by_id() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new()
            .add_finding(&catalog, 16, OCCLUSAL, "caries")
            .add_finding(&catalog, 54, ChartSite::Whole, "extraction");

        let deciduous_id = engine.tooth(54).unwrap().findings[0].id.clone();
        let next = engine.remove_finding(&deciduous_id);

        assert!(next.tooth(54).unwrap().findings.is_empty());
        assert_eq!(next.tooth(16).unwrap().findings.len(), 1);
        // Earlier snapshot untouched
        assert_eq!(engine.pending_findings().len(), 2);
    }

    #[test]
    fn test_edit_copies_only_touched_tooth() {
        let catalog = TreatmentCatalog::standard();
        let before = DentitionEngine::new();
        let after = before.add_finding(&catalog, 16, OCCLUSAL, "caries");

        assert!(!after.permanent().shares_tooth_with(before.permanent(), 16));
        assert!(after.permanent().shares_tooth_with(before.permanent(), 17));
        assert!(Arc::ptr_eq(&after.deciduous, &before.deciduous));
    }

    #[test]
    fn test_pending_findings_order() {
        let catalog = TreatmentCatalog::standard();
        let engine = DentitionEngine::new()
            .add_finding(&catalog, 75, ChartSite::Whole, "missing")
            .add_finding(&catalog, 36, OCCLUSAL, "caries")
            .add_finding(&catalog, 11, ChartSite::Whole, "healthy");

        let teeth: Vec<ToothId> = engine.pending_findings().iter().map(|f| f.tooth_id).collect();
        assert_eq!(teeth, vec![11, 36, 75]);
    }
}
