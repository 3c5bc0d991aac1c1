//! Order Model

use serde::{Deserialize, Serialize};

use super::Unit;

/// Order status
///
/// `Fulfilled` and `Cancelled` are terminal; there is no transition out of
/// either. Stock is only touched on the `Pending -> Fulfilled` transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Cancelled)
    }
}

/// One line of a pickup order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Inventory item reference (String ID)
    pub item_id: String,
    pub item_name: String,
    pub quantity: f64,
    pub category: String,
    pub unit: Unit,
}

/// Pickup order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub student_id: String,
    pub items: Vec<OrderLineItem>,
    pub status: OrderStatus,
    /// Submission time, UTC milliseconds
    pub created_at: i64,
    /// Set exactly once, on the fulfillment transition
    pub fulfilled_at: Option<i64>,
    pub notified: bool,
}

impl Order {
    /// New pending order with no inventory effect.
    pub fn pending(id: String, student_id: String, items: Vec<OrderLineItem>, now_ms: i64) -> Self {
        Self {
            id,
            student_id,
            items,
            status: OrderStatus::Pending,
            created_at: now_ms,
            fulfilled_at: None,
            notified: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Fulfilled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_pending_constructor() {
        let order = Order::pending("order-1".into(), "student1".into(), vec![], 1_000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, 1_000);
        assert!(order.fulfilled_at.is_none());
        assert!(!order.notified);
    }
}
