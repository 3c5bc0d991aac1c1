//! Checkout Ledger Model

use serde::{Deserialize, Serialize};

use super::Unit;

/// One completed checkout of an item by a student
///
/// Immutable once written; the ledger is append-only. Cooldown evaluation
/// only ever looks at the most recent record per (student, item) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRecord {
    pub student_id: String,
    /// Inventory item reference (String ID)
    pub item_id: String,
    pub quantity: f64,
    /// UTC milliseconds
    pub timestamp: i64,
    pub unit: Unit,
}
