//! Treatment plan models: treatment items and sessions.

use serde::{Deserialize, Serialize};

use super::tooth::{ChartSite, ToothId};

/// Clinical status of a treatment item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentStatus {
    /// Planned, not yet performed
    Proposed,
    /// Performed
    Completed,
}

impl TreatmentStatus {
    /// The opposite status.
    pub fn toggled(self) -> Self {
        match self {
            TreatmentStatus::Proposed => TreatmentStatus::Completed,
            TreatmentStatus::Completed => TreatmentStatus::Proposed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentStatus::Proposed => "proposed",
            TreatmentStatus::Completed => "completed",
        }
    }
}

/// Administrative status of a session. Not derived from its items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Completed => "completed",
        }
    }
}

/// A planned or performed treatment, owned by exactly one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentItem {
    /// Unique item ID
    pub id: String,
    /// Catalog id of the treatment
    pub treatment_id: String,
    /// Tooth the treatment applies to
    pub tooth_id: ToothId,
    /// Surface or whole tooth
    pub site: ChartSite,
    /// Proposed or completed
    pub status: TreatmentStatus,
    /// Owning session; fixed at creation
    pub session_id: String,
}

impl TreatmentItem {
    /// Create a proposed item with a fresh id.
    pub fn proposed(
        treatment_id: impl Into<String>,
        tooth_id: ToothId,
        site: ChartSite,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            treatment_id: treatment_id.into(),
            tooth_id,
            site,
            status: TreatmentStatus::Proposed,
            session_id: session_id.into(),
        }
    }
}

/// A named group of treatment items representing one planned visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Unique session ID
    pub id: String,
    /// Display name (e.g., "Session 2")
    pub name: String,
    /// Administrative status
    pub status: SessionStatus,
    /// Items in assignment order
    pub items: Vec<TreatmentItem>,
}

impl Session {
    /// Create an empty pending session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            status: SessionStatus::Pending,
            items: Vec::new(),
        }
    }

    /// Items with the given status, in assignment order.
    pub fn items_with_status(
        &self,
        status: TreatmentStatus,
    ) -> impl Iterator<Item = &TreatmentItem> + '_ {
        self.items.iter().filter(move |item| item.status == status)
    }

    /// Find an item by id.
    pub fn item(&self, item_id: &str) -> Option<&TreatmentItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Surface;

    #[test]
    fn test_status_toggle() {
        assert_eq!(TreatmentStatus::Proposed.toggled(), TreatmentStatus::Completed);
        assert_eq!(TreatmentStatus::Completed.toggled(), TreatmentStatus::Proposed);
    }

    #[test]
    fn test_new_session_is_pending_and_empty() {
        let session = Session::new("Session 1");
        assert_eq!(session.status, SessionStatus::Pending);
        assert!(session.items.is_empty());
        assert_eq!(session.id.len(), 36);
    }

    #[test]
    fn test_items_with_status() {
        let mut session = Session::new("Session 1");
        let site = ChartSite::Surface(Surface::Occlusal);
        session.items.push(TreatmentItem::proposed("caries", 16, site, &session.id));
        let mut done = TreatmentItem::proposed("filling", 16, site, &session.id);
        done.status = TreatmentStatus::Completed;
        session.items.push(done);

        assert_eq!(session.items_with_status(TreatmentStatus::Proposed).count(), 1);
        assert_eq!(session.items_with_status(TreatmentStatus::Completed).count(), 1);
    }
}
