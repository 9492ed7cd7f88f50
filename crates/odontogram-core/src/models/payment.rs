//! Payment models.

use serde::{Deserialize, Serialize};

/// How a payment was made.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    /// Phone wallet transfers (Yape, Plin)
    MobileWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::MobileWallet => "mobile_wallet",
        }
    }

    /// Parse a method name, accepting the serialized names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "mobile_wallet" => Some(PaymentMethod::MobileWallet),
            _ => None,
        }
    }
}

/// A payment received against the treatment plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    /// Unique payment ID
    pub id: String,
    /// Amount in minor currency units (always positive)
    pub amount: u64,
    /// Payment method
    pub method: PaymentMethod,
    /// Recording timestamp
    pub recorded_at: String,
}

impl Payment {
    /// Create a payment stamped with the current time.
    pub fn new(amount: u64, method: PaymentMethod) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            method,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
