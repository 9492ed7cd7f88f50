//! Payment ledger and account balance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TreatmentCatalog;
use crate::models::{Payment, PaymentMethod};
use crate::plan::TreatmentPlan;

/// Ledger errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Payment amount must be positive")]
    InvalidAmount,
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Payments received, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentLedger {
    payments: Vec<Payment>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Record a payment. Zero amounts are rejected.
    pub fn record(&self, amount: u64, method: PaymentMethod) -> LedgerResult<Self> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let payment = Payment::new(amount, method);
        tracing::debug!(payment_id = %payment.id, amount, method = method.as_str(), "payment recorded");

        let mut next = self.clone();
        next.payments.push(payment);
        Ok(next)
    }

    /// Remove a payment by id. Unknown ids leave the ledger unchanged.
    pub fn remove(&self, payment_id: &str) -> Self {
        if !self.payments.iter().any(|p| p.id == payment_id) {
            tracing::warn!(payment_id, "payment removal ignored: not found");
            return self.clone();
        }
        let mut next = self.clone();
        next.payments.retain(|p| p.id != payment_id);
        next
    }

    /// Sum of all payments, saturating at `u64::MAX`.
    pub fn total_paid(&self) -> u64 {
        self.payments
            .iter()
            .map(|p| p.amount)
            .fold(0, u64::saturating_add)
    }
}

/// Cost, payments and outstanding balance of a treatment plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    /// Grand total of every treatment item
    pub total_cost: u64,
    pub total_paid: u64,
    /// Negative when the patient has paid in advance
    pub balance: i64,
}

impl AccountSummary {
    pub fn compute(plan: &TreatmentPlan, ledger: &PaymentLedger, catalog: &TreatmentCatalog) -> Self {
        let total_cost = plan.grand_total(catalog);
        let total_paid = ledger.total_paid();
        Self {
            total_cost,
            total_paid,
            balance: signed_difference(total_cost, total_paid),
        }
    }
}

/// `a - b` clamped to the `i64` range.
fn signed_difference(a: u64, b: u64) -> i64 {
    let diff = i128::from(a) - i128::from(b);
    i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
}
