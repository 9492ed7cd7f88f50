//! Clinical workflow: finding → session assignment → completion.
//!
//! The controller is the only place that touches both the dentition engine
//! and the treatment plan in one operation. Every operation takes a snapshot
//! and returns a new one; invalid references are logged and produce an
//! unchanged snapshot instead of an error.

mod snapshot;

pub use snapshot::*;

use std::sync::Arc;

use crate::billing::{AccountStatement, AccountSummary, LedgerResult};
use crate::catalog::TreatmentCatalog;
use crate::config::ChartConfig;
use crate::models::{ChartSite, PaymentMethod, SessionStatus, ToothId, TreatmentItem};
use crate::plan::SessionSummary;

/// Workflow controller bound to a catalog and configuration.
#[derive(Debug, Clone)]
pub struct ClinicalWorkflow {
    catalog: Arc<TreatmentCatalog>,
    config: ChartConfig,
}

impl Default for ClinicalWorkflow {
    fn default() -> Self {
        Self::new(TreatmentCatalog::standard(), ChartConfig::default())
    }
}

impl ClinicalWorkflow {
    pub fn new(catalog: TreatmentCatalog, config: ChartConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config,
        }
    }

    pub fn catalog(&self) -> &TreatmentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    // =========================================================================
    // Findings
    // =========================================================================

    /// Record a diagnosis on a tooth site.
    pub fn add_finding(
        &self,
        snapshot: &ChartSnapshot,
        tooth_id: ToothId,
        site: ChartSite,
        condition: &str,
    ) -> ChartSnapshot {
        let dentitions = snapshot
            .dentitions()
            .add_finding(&self.catalog, tooth_id, site, condition);
        if &dentitions == snapshot.dentitions() {
            return snapshot.clone();
        }
        snapshot.with_dentitions(dentitions)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Append a session named from the configured prefix ("Session 3").
    pub fn create_session(&self, snapshot: &ChartSnapshot) -> ChartSnapshot {
        let name = self.config.session_name(snapshot.plan().len() + 1);
        self.create_named_session(snapshot, &name)
    }

    /// Append a session with an explicit name.
    pub fn create_named_session(&self, snapshot: &ChartSnapshot, name: &str) -> ChartSnapshot {
        snapshot.with_plan(snapshot.plan().create_session(name))
    }

    /// Set the administrative status of a session.
    pub fn set_session_status(
        &self,
        snapshot: &ChartSnapshot,
        session_id: &str,
        status: SessionStatus,
    ) -> ChartSnapshot {
        match snapshot.plan().set_session_status(session_id, status) {
            Some(plan) => snapshot.with_plan(plan),
            None => {
                tracing::warn!(session_id, "session status ignored: session not found");
                snapshot.clone()
            }
        }
    }

    // =========================================================================
    // Assignment and status
    // =========================================================================

    /// Promote a pending finding into a proposed treatment item of a session.
    ///
    /// The finding is consumed only when the item was created. The chart is
    /// not touched: proposed items become visible on their first toggle.
    pub fn assign_finding(
        &self,
        snapshot: &ChartSnapshot,
        finding_id: &str,
        session_id: &str,
    ) -> ChartSnapshot {
        let Some(finding) = snapshot.dentitions().find_finding(finding_id) else {
            tracing::warn!(finding_id, "assignment ignored: finding not found");
            return snapshot.clone();
        };

        if self.catalog.lookup(&finding.condition).is_none() {
            tracing::warn!(
                finding_id,
                condition = %finding.condition,
                "assignment ignored: unknown condition"
            );
            return snapshot.clone();
        }

        let item = TreatmentItem::proposed(
            finding.condition.clone(),
            finding.tooth_id,
            finding.site,
            session_id,
        );
        let item_id = item.id.clone();

        let Some(plan) = snapshot.plan().append_item(session_id, item) else {
            tracing::warn!(finding_id, session_id, "assignment ignored: session not found");
            return snapshot.clone();
        };

        tracing::debug!(finding_id, session_id, item_id = %item_id, "finding promoted to treatment item");
        let dentitions = snapshot.dentitions().remove_finding(finding_id);
        snapshot.with_plan(plan).with_dentitions(dentitions)
    }

    /// Flip a treatment item between proposed and completed and write it
    /// into the chart.
    pub fn toggle_treatment_status(
        &self,
        snapshot: &ChartSnapshot,
        session_id: &str,
        item_id: &str,
    ) -> ChartSnapshot {
        let Some((plan, item)) = snapshot.plan().toggle_item_status(session_id, item_id) else {
            tracing::warn!(session_id, item_id, "status toggle ignored: item not found");
            return snapshot.clone();
        };

        tracing::debug!(session_id, item_id, status = item.status.as_str(), "treatment status toggled");
        let dentitions = snapshot.dentitions().place_item(&self.catalog, &item);
        snapshot.with_plan(plan).with_dentitions(dentitions)
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Record a payment against the plan.
    pub fn record_payment(
        &self,
        snapshot: &ChartSnapshot,
        amount: u64,
        method: PaymentMethod,
    ) -> LedgerResult<ChartSnapshot> {
        let ledger = snapshot.ledger().record(amount, method)?;
        Ok(snapshot.with_ledger(ledger))
    }

    /// Remove a payment by id.
    pub fn remove_payment(&self, snapshot: &ChartSnapshot, payment_id: &str) -> ChartSnapshot {
        snapshot.with_ledger(snapshot.ledger().remove(payment_id))
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Per-session totals for the treatment plan screen.
    pub fn session_summaries(&self, snapshot: &ChartSnapshot) -> Vec<SessionSummary> {
        snapshot.plan().summaries(&self.catalog)
    }

    /// Sum of every item across all sessions.
    pub fn grand_total(&self, snapshot: &ChartSnapshot) -> u64 {
        snapshot.plan().grand_total(&self.catalog)
    }

    pub fn account_summary(&self, snapshot: &ChartSnapshot) -> AccountSummary {
        AccountSummary::compute(snapshot.plan(), snapshot.ledger(), &self.catalog)
    }

    pub fn statement(&self, snapshot: &ChartSnapshot, patient_name: &str) -> AccountStatement {
        AccountStatement::build(
            snapshot.plan(),
            snapshot.ledger(),
            &self.catalog,
            &self.config,
            patient_name,
        )
    }
}
