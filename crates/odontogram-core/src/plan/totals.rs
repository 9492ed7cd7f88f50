//! Derived cost views over the treatment plan. Nothing here is stored.

use serde::{Deserialize, Serialize};

use crate::catalog::TreatmentCatalog;
use crate::models::{Session, SessionStatus, TreatmentItem, TreatmentStatus};

use super::TreatmentPlan;

/// Sum of catalog prices for a set of items. Unknown treatments count as 0.
/// Saturates at `u64::MAX`.
pub fn subtotal<'a>(
    items: impl IntoIterator<Item = &'a TreatmentItem>,
    catalog: &TreatmentCatalog,
) -> u64 {
    items
        .into_iter()
        .map(|item| {
            let price = catalog.lookup(&item.treatment_id).map(|d| d.price);
            if price.is_none() {
                tracing::warn!(
                    item_id = %item.id,
                    treatment_id = %item.treatment_id,
                    "unknown treatment priced at 0"
                );
            }
            price.unwrap_or(0)
        })
        .fold(0, u64::saturating_add)
}

/// Proposed and completed subtotals of one session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTotals {
    pub proposed: u64,
    pub completed: u64,
}

impl SessionTotals {
    /// Compute totals for a session.
    pub fn of(session: &Session, catalog: &TreatmentCatalog) -> Self {
        Self {
            proposed: subtotal(session.items_with_status(TreatmentStatus::Proposed), catalog),
            completed: subtotal(session.items_with_status(TreatmentStatus::Completed), catalog),
        }
    }

    pub fn total(&self) -> u64 {
        self.proposed.saturating_add(self.completed)
    }
}

/// Read-only view of a session for the plan and billing screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: String,
    pub name: String,
    pub status: SessionStatus,
    pub item_count: usize,
    pub totals: SessionTotals,
}

impl TreatmentPlan {
    /// Totals of one session, `None` if it does not exist.
    pub fn session_totals(&self, session_id: &str, catalog: &TreatmentCatalog) -> Option<SessionTotals> {
        self.session(session_id)
            .map(|session| SessionTotals::of(session, catalog))
    }

    /// Sum of every item across all sessions regardless of status.
    pub fn grand_total(&self, catalog: &TreatmentCatalog) -> u64 {
        subtotal(self.items(), catalog)
    }

    /// One summary per session, in session order.
    pub fn summaries(&self, catalog: &TreatmentCatalog) -> Vec<SessionSummary> {
        self.sessions()
            .map(|session| SessionSummary {
                session_id: session.id.clone(),
                name: session.name.clone(),
                status: session.status,
                item_count: session.items.len(),
                totals: SessionTotals::of(session, catalog),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppliesTo, ChartSite, TreatmentCategory, TreatmentDefinition};

    fn priced_catalog() -> TreatmentCatalog {
        TreatmentCatalog::new(vec![
            TreatmentDefinition::new("a", "A", TreatmentCategory::Operative, 10, AppliesTo::Surface),
            TreatmentDefinition::new("b", "B", TreatmentCategory::Operative, 20, AppliesTo::Surface),
            TreatmentDefinition::new("c", "C", TreatmentCategory::Surgery, 5, AppliesTo::WholeTooth),
        ])
        .unwrap()
    }

    fn item(treatment_id: &str, status: TreatmentStatus, session_id: &str) -> TreatmentItem {
        let mut item = TreatmentItem::proposed(treatment_id, 11, ChartSite::Whole, session_id);
        item.status = status;
        item
    }

    #[test]
    fn test_session_totals() {
        let catalog = priced_catalog();
        let mut session = Session::new("Session 1");
        session.items = vec![
            item("a", TreatmentStatus::Proposed, &session.id),
            item("b", TreatmentStatus::Proposed, &session.id),
            item("c", TreatmentStatus::Completed, &session.id),
        ];

        let totals = SessionTotals::of(&session, &catalog);
        assert_eq!(totals.proposed, 30);
        assert_eq!(totals.completed, 5);
        assert_eq!(totals.total(), 35);
    }

    #[test]
    fn test_unknown_treatment_counts_zero() {
        let catalog = priced_catalog();
        let items = [
            item("a", TreatmentStatus::Proposed, "s"),
            item("gone", TreatmentStatus::Proposed, "s"),
        ];
        assert_eq!(subtotal(&items, &catalog), 10);
    }

    #[test]
    fn test_grand_total_spans_sessions() {
        let catalog = priced_catalog();
        let plan = TreatmentPlan::new().create_session("One").create_session("Two");
        let ids: Vec<String> = plan.sessions().map(|s| s.id.clone()).collect();

        let plan = plan
            .append_item(&ids[0], item("a", TreatmentStatus::Proposed, &ids[0]))
            .and_then(|p| p.append_item(&ids[1], item("b", TreatmentStatus::Completed, &ids[1])))
            .and_then(|p| p.append_item(&ids[1], item("c", TreatmentStatus::Proposed, &ids[1])))
            .unwrap();

        assert_eq!(plan.grand_total(&catalog), 35);

        let summaries = plan.summaries(&catalog);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].item_count, 2);
        assert_eq!(summaries[1].totals, SessionTotals { proposed: 5, completed: 20 });
        assert_eq!(plan.session_totals("nope", &catalog), None);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let catalog = TreatmentCatalog::new(vec![
            TreatmentDefinition::new("big", "Big", TreatmentCategory::Other, u64::MAX / 2 + 1, AppliesTo::WholeTooth),
        ])
        .unwrap();
        let mut session = Session::new("Session 1");
        session.items = vec![
            item("big", TreatmentStatus::Proposed, &session.id),
            item("big", TreatmentStatus::Proposed, &session.id),
            item("big", TreatmentStatus::Completed, &session.id),
        ];

        assert_eq!(subtotal(&session.items, &catalog), u64::MAX);
        let totals = SessionTotals::of(&session, &catalog);
        assert_eq!(totals.proposed, u64::MAX);
        assert_eq!(totals.total(), u64::MAX);
    }

    #[test]
    fn test_empty_plan_totals_zero() {
        let catalog = priced_catalog();
        assert_eq!(TreatmentPlan::new().grand_total(&catalog), 0);
    }
}
