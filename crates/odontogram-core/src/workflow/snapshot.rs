//! Immutable chart snapshot handed back by every workflow operation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::billing::PaymentLedger;
use crate::dentition::{Dentition, DentitionEngine, DentitionKind};
use crate::models::{ClinicalFinding, ToothId, ToothState};
use crate::plan::TreatmentPlan;

/// Complete charting state of one patient at a point in time.
///
/// Cloning is cheap: each store sits behind an `Arc` and only the stores an
/// operation touches are replaced in the returned snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSnapshot {
    pub(crate) dentitions: Arc<DentitionEngine>,
    pub(crate) plan: Arc<TreatmentPlan>,
    pub(crate) ledger: Arc<PaymentLedger>,
}

impl ChartSnapshot {
    /// Blank charts, no sessions, no payments.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dentitions(&self) -> &DentitionEngine {
        &self.dentitions
    }

    pub fn dentition(&self, kind: DentitionKind) -> &Dentition {
        self.dentitions.dentition(kind)
    }

    pub fn tooth(&self, tooth_id: ToothId) -> Option<&ToothState> {
        self.dentitions.tooth(tooth_id)
    }

    /// Findings awaiting assignment, for the "to plan" panel.
    pub fn pending_findings(&self) -> Vec<&ClinicalFinding> {
        self.dentitions.pending_findings()
    }

    pub fn plan(&self) -> &TreatmentPlan {
        &self.plan
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    pub(crate) fn with_dentitions(&self, dentitions: DentitionEngine) -> Self {
        Self {
            dentitions: Arc::new(dentitions),
            ..self.clone()
        }
    }

    pub(crate) fn with_plan(&self, plan: TreatmentPlan) -> Self {
        Self {
            plan: Arc::new(plan),
            ..self.clone()
        }
    }

    pub(crate) fn with_ledger(&self, ledger: PaymentLedger) -> Self {
        Self {
            ledger: Arc::new(ledger),
            ..self.clone()
        }
    }

    /// Whether two snapshots share the same dentition store allocation.
    pub fn shares_dentitions_with(&self, other: &ChartSnapshot) -> bool {
        Arc::ptr_eq(&self.dentitions, &other.dentitions)
    }

    /// Whether two snapshots share the same plan store allocation.
    pub fn shares_plan_with(&self, other: &ChartSnapshot) -> bool {
        Arc::ptr_eq(&self.plan, &other.plan)
    }
}
