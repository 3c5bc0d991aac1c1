//! Transaction Model (audit trail)

use serde::{Deserialize, Serialize};

use super::Unit;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Intake / restock
    In,
    /// Fulfilled checkout
    Out,
}

/// One stock movement, kept for analytics and auditing.
///
/// Not required for correctness of eligibility or fulfillment; the ledger
/// of [`CheckoutRecord`](super::CheckoutRecord)s is what cooldowns read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Inventory item reference (String ID)
    pub item_id: String,
    pub item_name: String,
    pub quantity: f64,
    /// Staff username for intake, student id for checkouts
    pub actor: String,
    /// UTC milliseconds
    pub timestamp: i64,
    pub unit: Unit,
}
