//! Odontogram Core Library
//!
//! Charting and treatment-planning engine for a dental clinic.
//!
//! # Architecture
//!
//! ```text
//!  Operator selects treatment + tooth/site
//!                  │
//!                  ▼
//!        [PENDING: clinical finding]
//!                  │
//!        Operator assigns to session
//!                  │
//!                  ▼
//!   Treatment item (proposed) in session ──► Totals / Account statement
//!                  │
//!        Operator toggles status
//!                  │
//!                  ▼
//!   ┌──────────────────────────────────┐
//!   │   Placement on tooth chart        │
//!   │   surface / crown / root / whole  │
//!   └──────────────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Snapshots are immutable.** Every operation returns a new
//! [`ChartSnapshot`]; unknown ids are logged and leave state unchanged.
//!
//! # Modules
//!
//! - [`models`]: Domain types (TreatmentDefinition, ToothState, Session, etc.)
//! - [`catalog`]: Treatment catalog lookup and label search
//! - [`dentition`]: Permanent/deciduous charts and placement rules
//! - [`plan`]: Sessions and derived totals
//! - [`workflow`]: Finding → session → completion lifecycle
//! - [`billing`]: Payments and account statements
//! - [`config`]: Chart configuration
//! - [`logging`]: `tracing` subscriber setup

pub mod billing;
pub mod catalog;
pub mod config;
pub mod dentition;
pub mod logging;
pub mod models;
pub mod plan;
pub mod workflow;

// Re-export commonly used types
pub use billing::{AccountStatement, AccountSummary, PaymentLedger};
pub use catalog::TreatmentCatalog;
pub use config::ChartConfig;
pub use dentition::{which_dentition, Dentition, DentitionEngine, DentitionKind, Placement};
pub use models::{
    AppliesTo, ChartSite, ClinicalFinding, Payment, PaymentMethod, Session, SessionStatus,
    Surface, ToothId, ToothState, TreatmentCategory, TreatmentDefinition, TreatmentItem,
    TreatmentStatus,
};
pub use plan::{SessionSummary, SessionTotals, TreatmentPlan};
pub use workflow::{ChartSnapshot, ClinicalWorkflow};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum OdontogramError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for OdontogramError {
    fn from(e: config::ConfigError) -> Self {
        OdontogramError::ConfigError(e.to_string())
    }
}

impl From<billing::LedgerError> for OdontogramError {
    fn from(e: billing::LedgerError) -> Self {
        OdontogramError::InvalidInput(e.to_string())
    }
}

impl From<models::ParseSiteError> for OdontogramError {
    fn from(e: models::ParseSiteError) -> Self {
        OdontogramError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for OdontogramError {
    fn from(e: serde_json::Error) -> Self {
        OdontogramError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for OdontogramError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        OdontogramError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a blank chart with the standard catalog and default configuration.
#[uniffi::export]
pub fn open_chart() -> Arc<OdontogramCore> {
    Arc::new(OdontogramCore::with_workflow(ClinicalWorkflow::default()))
}

/// Open a blank chart configured from a TOML document.
#[uniffi::export]
pub fn open_chart_with_config(config_toml: String) -> Result<Arc<OdontogramCore>, OdontogramError> {
    let config = ChartConfig::from_toml_str(&config_toml)?;
    let workflow = ClinicalWorkflow::new(TreatmentCatalog::standard(), config);
    Ok(Arc::new(OdontogramCore::with_workflow(workflow)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe holder of the current snapshot for FFI.
#[derive(uniffi::Object)]
pub struct OdontogramCore {
    workflow: ClinicalWorkflow,
    current: Mutex<ChartSnapshot>,
}

impl OdontogramCore {
    fn with_workflow(workflow: ClinicalWorkflow) -> Self {
        Self {
            workflow,
            current: Mutex::new(ChartSnapshot::new()),
        }
    }

    fn update(
        &self,
        op: impl FnOnce(&ClinicalWorkflow, &ChartSnapshot) -> Result<ChartSnapshot, OdontogramError>,
    ) -> Result<(), OdontogramError> {
        let mut current = self.current.lock()?;
        let next = op(&self.workflow, &*current)?;
        *current = next;
        Ok(())
    }

    /// Current snapshot, for Rust callers embedding the facade.
    pub fn snapshot(&self) -> Result<ChartSnapshot, OdontogramError> {
        Ok(self.current.lock()?.clone())
    }
}

#[uniffi::export]
impl OdontogramCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Search the catalog by label. Empty query lists everything.
    pub fn search_catalog(&self, query: String) -> Vec<FfiTreatmentDefinition> {
        self.workflow
            .catalog()
            .search(&query)
            .into_iter()
            .map(|hit| hit.definition.into())
            .collect()
    }

    // =========================================================================
    // Chart Operations
    // =========================================================================

    /// Record a finding. `site` is a surface name or "whole".
    pub fn add_finding(&self, tooth_id: u8, site: String, condition: String) -> Result<(), OdontogramError> {
        let site: ChartSite = site.parse()?;
        self.update(|workflow, snapshot| Ok(workflow.add_finding(snapshot, tooth_id, site, &condition)))
    }

    /// Findings awaiting assignment.
    pub fn pending_findings(&self) -> Result<Vec<FfiFinding>, OdontogramError> {
        let current = self.current.lock()?;
        Ok(current.pending_findings().into_iter().map(FfiFinding::from).collect())
    }

    /// Charted state of one tooth.
    pub fn tooth_state(&self, tooth_id: u8) -> Result<Option<FfiToothState>, OdontogramError> {
        let current = self.current.lock()?;
        Ok(current.tooth(tooth_id).map(|tooth| FfiToothState::from_state(tooth_id, tooth)))
    }

    // =========================================================================
    // Plan Operations
    // =========================================================================

    /// Create the next session and return its summary.
    pub fn create_session(&self) -> Result<FfiSessionSummary, OdontogramError> {
        self.update(|workflow, snapshot| Ok(workflow.create_session(snapshot)))?;
        self.session_summaries()?
            .pop()
            .ok_or_else(|| OdontogramError::Internal("session was not created".into()))
    }

    pub fn assign_finding(&self, finding_id: String, session_id: String) -> Result<(), OdontogramError> {
        self.update(|workflow, snapshot| Ok(workflow.assign_finding(snapshot, &finding_id, &session_id)))
    }

    pub fn toggle_treatment_status(&self, session_id: String, item_id: String) -> Result<(), OdontogramError> {
        self.update(|workflow, snapshot| {
            Ok(workflow.toggle_treatment_status(snapshot, &session_id, &item_id))
        })
    }

    pub fn set_session_completed(&self, session_id: String, completed: bool) -> Result<(), OdontogramError> {
        let status = if completed {
            SessionStatus::Completed
        } else {
            SessionStatus::Pending
        };
        self.update(|workflow, snapshot| Ok(workflow.set_session_status(snapshot, &session_id, status)))
    }

    pub fn session_items(&self, session_id: String) -> Result<Vec<FfiTreatmentItem>, OdontogramError> {
        let current = self.current.lock()?;
        Ok(current
            .plan()
            .session(&session_id)
            .map(|session| session.items.iter().map(FfiTreatmentItem::from).collect())
            .unwrap_or_default())
    }

    pub fn session_summaries(&self) -> Result<Vec<FfiSessionSummary>, OdontogramError> {
        let current = self.current.lock()?;
        Ok(self
            .workflow
            .session_summaries(&current)
            .into_iter()
            .map(FfiSessionSummary::from)
            .collect())
    }

    pub fn grand_total(&self) -> Result<u64, OdontogramError> {
        let current = self.current.lock()?;
        Ok(self.workflow.grand_total(&current))
    }

    // =========================================================================
    // Billing Operations
    // =========================================================================

    /// Record a payment. `method` is cash, card, bank_transfer or mobile_wallet.
    pub fn record_payment(&self, amount: u64, method: String) -> Result<(), OdontogramError> {
        let method = PaymentMethod::parse(&method)
            .ok_or_else(|| OdontogramError::InvalidInput(format!("Unknown payment method: {}", method)))?;
        self.update(|workflow, snapshot| Ok(workflow.record_payment(snapshot, amount, method)?))
    }

    pub fn remove_payment(&self, payment_id: String) -> Result<(), OdontogramError> {
        self.update(|workflow, snapshot| Ok(workflow.remove_payment(snapshot, &payment_id)))
    }

    pub fn account_summary(&self) -> Result<FfiAccountSummary, OdontogramError> {
        let current = self.current.lock()?;
        Ok(self.workflow.account_summary(&current).into())
    }

    /// Export the account statement as JSON.
    pub fn export_statement_json(&self, patient_name: String) -> Result<String, OdontogramError> {
        let current = self.current.lock()?;
        Ok(self.workflow.statement(&current, &patient_name).to_json()?)
    }

    /// Export the account statement as CSV.
    pub fn export_statement_csv(&self, patient_name: String) -> Result<String, OdontogramError> {
        let current = self.current.lock()?;
        Ok(self.workflow.statement(&current, &patient_name).to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe treatment definition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentDefinition {
    pub id: String,
    pub label: String,
    pub category: String,
    pub price: u64,
    pub applies_to: String,
}

impl From<&TreatmentDefinition> for FfiTreatmentDefinition {
    fn from(definition: &TreatmentDefinition) -> Self {
        let applies_to = match definition.applies_to {
            AppliesTo::Surface => "surface",
            AppliesTo::Root => "root",
            AppliesTo::WholeTooth => "whole_tooth",
        };
        Self {
            id: definition.id.clone(),
            label: definition.label.clone(),
            category: definition.category.as_str().to_string(),
            price: definition.price,
            applies_to: applies_to.to_string(),
        }
    }
}

/// FFI-safe clinical finding.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFinding {
    pub id: String,
    pub tooth_id: u8,
    pub site: String,
    pub condition: String,
}

impl From<&ClinicalFinding> for FfiFinding {
    fn from(finding: &ClinicalFinding) -> Self {
        Self {
            id: finding.id.clone(),
            tooth_id: finding.tooth_id,
            site: finding.site.to_string(),
            condition: finding.condition.clone(),
        }
    }
}

/// FFI-safe treatment item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentItem {
    pub id: String,
    pub treatment_id: String,
    pub tooth_id: u8,
    pub site: String,
    pub status: String,
    pub session_id: String,
}

impl From<&TreatmentItem> for FfiTreatmentItem {
    fn from(item: &TreatmentItem) -> Self {
        Self {
            id: item.id.clone(),
            treatment_id: item.treatment_id.clone(),
            tooth_id: item.tooth_id,
            site: item.site.to_string(),
            status: item.status.as_str().to_string(),
            session_id: item.session_id.clone(),
        }
    }
}

/// FFI-safe surface slot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSurfaceSlot {
    pub surface: String,
    pub items: Vec<FfiTreatmentItem>,
}

/// FFI-safe tooth state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToothState {
    pub tooth_id: u8,
    pub dentition: String,
    pub surfaces: Vec<FfiSurfaceSlot>,
    pub whole: Vec<FfiTreatmentItem>,
    pub findings: Vec<FfiFinding>,
}

impl FfiToothState {
    fn from_state(tooth_id: ToothId, tooth: &ToothState) -> Self {
        Self {
            tooth_id,
            dentition: which_dentition(tooth_id)
                .map(|kind| kind.as_str().to_string())
                .unwrap_or_default(),
            surfaces: Surface::ALL
                .iter()
                .map(|surface| FfiSurfaceSlot {
                    surface: surface.as_str().to_string(),
                    items: tooth.surface(*surface).iter().map(FfiTreatmentItem::from).collect(),
                })
                .collect(),
            whole: tooth.whole.iter().map(FfiTreatmentItem::from).collect(),
            findings: tooth.findings.iter().map(FfiFinding::from).collect(),
        }
    }
}

/// FFI-safe session summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionSummary {
    pub session_id: String,
    pub name: String,
    pub status: String,
    pub item_count: u32,
    pub proposed_total: u64,
    pub completed_total: u64,
}

impl From<SessionSummary> for FfiSessionSummary {
    fn from(summary: SessionSummary) -> Self {
        Self {
            session_id: summary.session_id,
            name: summary.name,
            status: summary.status.as_str().to_string(),
            item_count: u32::try_from(summary.item_count).unwrap_or(u32::MAX),
            proposed_total: summary.totals.proposed,
            completed_total: summary.totals.completed,
        }
    }
}

/// FFI-safe account summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAccountSummary {
    pub total_cost: u64,
    pub total_paid: u64,
    pub balance: i64,
}

impl From<AccountSummary> for FfiAccountSummary {
    fn from(summary: AccountSummary) -> Self {
        Self {
            total_cost: summary.total_cost,
            total_paid: summary.total_paid,
            balance: summary.balance,
        }
    }
}
