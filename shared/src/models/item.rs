//! Inventory Item Model

use serde::{Deserialize, Serialize};

/// Unit of measurement for an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Item,
    Kg,
    Lb,
}

impl Unit {
    /// Validate a loosely-typed unit string at the boundary.
    ///
    /// Unknown or absent values fall back to [`Unit::Item`], matching how
    /// the storage format treats legacy records with a null unit.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("kg") => Self::Kg,
            Some("lb") => Self::Lb,
            _ => Self::Item,
        }
    }

    /// Short label used in display strings ("kg", "lb", "item").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }
}

/// Inventory item entity
///
/// `quantity` is real-valued: weighed items (rice, lentils) are tracked in
/// fractional kilograms or pounds. Stock is never negative; the only code
/// path that decrements it is order fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Category reference (String ID)
    pub category: String,
    /// Current stock on hand
    pub quantity: f64,
    /// Maximum quantity a student may take in one checkout
    pub student_limit: f64,
    /// Cooldown window: whole days component
    pub limit_duration_days: i64,
    /// Cooldown window: additional minutes component
    pub limit_duration_minutes: i64,
    pub unit: Unit,
    pub is_weighed: bool,
    /// Optional scan code for barcode-driven intake
    pub barcode: Option<String>,
}

impl InventoryItem {
    /// Total cooldown window in minutes. Zero means no restriction.
    pub fn restriction_minutes(&self) -> i64 {
        self.limit_duration_days * 24 * 60 + self.limit_duration_minutes
    }
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub student_limit: f64,
    pub limit_duration_days: i64,
    pub limit_duration_minutes: i64,
    pub unit: Option<Unit>,
    pub is_weighed: Option<bool>,
    pub barcode: Option<String>,
}

/// Update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub student_limit: Option<f64>,
    pub limit_duration_days: Option<i64>,
    pub limit_duration_minutes: Option<i64>,
    pub unit: Option<Unit>,
    pub is_weighed: Option<bool>,
    pub barcode: Option<String>,
}
