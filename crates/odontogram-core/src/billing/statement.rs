//! Account statement export (JSON and CSV) for the billing screen and
//! printed receipts.

use serde::{Deserialize, Serialize};

use crate::catalog::TreatmentCatalog;
use crate::config::ChartConfig;
use crate::models::{Payment, ToothId, TreatmentStatus};
use crate::plan::TreatmentPlan;

use super::{AccountSummary, PaymentLedger};

/// Statement header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub clinic_name: String,
    pub clinic_address: Option<String>,
    pub patient_name: String,
    pub currency_symbol: String,
    /// Generation timestamp
    pub generated_at: String,
}

/// One treatment item on the statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    pub session_name: String,
    pub item_id: String,
    pub tooth_id: ToothId,
    /// Surface name or "whole"
    pub site: String,
    /// Catalog label, or the raw id when the treatment is no longer listed
    pub description: String,
    pub status: TreatmentStatus,
    pub price: u64,
}

/// Full account statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    pub metadata: StatementMetadata,
    pub lines: Vec<StatementLine>,
    pub payments: Vec<Payment>,
    pub summary: AccountSummary,
}

impl AccountStatement {
    /// Build a statement from the current plan and ledger.
    pub fn build(
        plan: &TreatmentPlan,
        ledger: &PaymentLedger,
        catalog: &TreatmentCatalog,
        config: &ChartConfig,
        patient_name: &str,
    ) -> Self {
        let lines = plan
            .sessions()
            .flat_map(|session| {
                session.items.iter().map(move |item| {
                    let definition = catalog.lookup(&item.treatment_id);
                    StatementLine {
                        session_name: session.name.clone(),
                        item_id: item.id.clone(),
                        tooth_id: item.tooth_id,
                        site: item.site.to_string(),
                        description: definition
                            .map(|d| d.label.clone())
                            .unwrap_or_else(|| item.treatment_id.clone()),
                        status: item.status,
                        price: definition.map(|d| d.price).unwrap_or(0),
                    }
                })
            })
            .collect();

        Self {
            metadata: StatementMetadata {
                clinic_name: config.clinic_name.clone(),
                clinic_address: config.clinic_address.clone(),
                patient_name: patient_name.to_string(),
                currency_symbol: config.currency_symbol.clone(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
            lines,
            payments: ledger.payments().to_vec(),
            summary: AccountSummary::compute(plan, ledger, catalog),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export treatment lines to CSV. Prices are in minor units.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("patient,session,tooth,site,description,status,price\n");

        for line in &self.lines {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                escape_csv(&self.metadata.patient_name),
                escape_csv(&line.session_name),
                line.tooth_id,
                line.site,
                escape_csv(&line.description),
                line.status.as_str(),
                line.price,
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
