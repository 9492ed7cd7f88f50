//! Treatment plan store: ordered sessions and their treatment items.

mod totals;

pub use totals::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Session, SessionStatus, TreatmentItem};

/// Ordered collection of sessions. Persistent like the dentition engine:
/// edits copy only the touched session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentPlan {
    sessions: Vec<Arc<Session>>,
}

impl TreatmentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> + '_ {
        self.sessions.iter().map(Arc::as_ref)
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions().find(|s| s.id == session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Every item of every session, in session then assignment order.
    pub fn items(&self) -> impl Iterator<Item = &TreatmentItem> + '_ {
        self.sessions().flat_map(|s| s.items.iter())
    }

    /// Append a new empty pending session.
    pub fn create_session(&self, name: impl Into<String>) -> Self {
        let session = Session::new(name);
        tracing::debug!(session_id = %session.id, name = %session.name, "session created");
        let mut next = self.clone();
        next.sessions.push(Arc::new(session));
        next
    }

    /// Append an item to a session. `None` when the session does not exist.
    pub fn append_item(&self, session_id: &str, item: TreatmentItem) -> Option<Self> {
        let mut next = self.clone();
        next.edit_session(session_id, |session| session.items.push(item))?;
        Some(next)
    }

    /// Flip the status of an item inside a session.
    ///
    /// Returns the new plan and the updated item, or `None` when the session
    /// or the item does not exist.
    pub fn toggle_item_status(&self, session_id: &str, item_id: &str) -> Option<(Self, TreatmentItem)> {
        let mut next = self.clone();
        let updated = next.edit_session(session_id, |session| {
            session.items.iter_mut().find(|i| i.id == item_id).map(|item| {
                item.status = item.status.toggled();
                item.clone()
            })
        })??;
        Some((next, updated))
    }

    /// Set the administrative status of a session.
    pub fn set_session_status(&self, session_id: &str, status: SessionStatus) -> Option<Self> {
        let mut next = self.clone();
        next.edit_session(session_id, |session| session.status = status)?;
        Some(next)
    }

    fn edit_session<R>(&mut self, session_id: &str, edit: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .map(|session| edit(Arc::make_mut(session)))
    }
}
