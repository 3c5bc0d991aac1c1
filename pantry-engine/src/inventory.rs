//! Staff inventory intake
//!
//! Adding an item or raising its quantity records an inbound transaction so
//! analytics can tell restocks from checkouts. Lowering a quantity (shrink,
//! spoilage correction) is applied silently, mirroring the original app.

use thiserror::Error;
use tracing::info;

use shared::models::{InventoryItem, ItemCreate, ItemUpdate, Transaction, TransactionKind, Unit};
use shared::util;

use crate::repository::{InventoryRepository, TransactionLog};
use crate::storage::StorageError;

/// Intake errors
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

fn validate_stock_quantity(quantity: f64) -> Result<(), IntakeError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(IntakeError::InvalidQuantity(format!(
            "stock quantity must be a finite non-negative number, got {quantity}"
        )));
    }
    Ok(())
}

/// Intake operations over an injected store.
pub struct Intake<'a, S: InventoryRepository + TransactionLog> {
    store: &'a S,
    /// Staff username recorded on inbound transactions
    actor: String,
}

impl<'a, S: InventoryRepository + TransactionLog> Intake<'a, S> {
    pub fn new(store: &'a S, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
        }
    }

    /// Add a new item and record its initial quantity as an inbound
    /// transaction.
    pub fn add_item(&self, payload: ItemCreate, now_ms: i64) -> Result<InventoryItem, IntakeError> {
        validate_stock_quantity(payload.quantity)?;

        let item = InventoryItem {
            id: util::item_id(),
            name: payload.name,
            category: payload.category,
            quantity: payload.quantity,
            student_limit: payload.student_limit,
            limit_duration_days: payload.limit_duration_days,
            limit_duration_minutes: payload.limit_duration_minutes,
            unit: payload.unit.unwrap_or(Unit::Item),
            is_weighed: payload.is_weighed.unwrap_or(false),
            barcode: payload.barcode,
        };
        self.store.insert_item(&item)?;

        self.record_inbound(&item, item.quantity, now_ms)?;
        info!(item_id = %item.id, name = %item.name, quantity = item.quantity, "item added");
        Ok(item)
    }

    /// Apply an update to an existing item.
    ///
    /// When the update raises the stock quantity the difference is recorded
    /// as an inbound transaction (a restock); decreases are not logged.
    pub fn update_item(
        &self,
        item_id: &str,
        payload: ItemUpdate,
        now_ms: i64,
    ) -> Result<InventoryItem, IntakeError> {
        let mut item = self
            .store
            .get_item(item_id)?
            .ok_or_else(|| IntakeError::ItemNotFound(item_id.to_string()))?;
        let old_quantity = item.quantity;

        if let Some(name) = payload.name {
            item.name = name;
        }
        if let Some(category) = payload.category {
            item.category = category;
        }
        if let Some(quantity) = payload.quantity {
            validate_stock_quantity(quantity)?;
            item.quantity = quantity;
        }
        if let Some(student_limit) = payload.student_limit {
            item.student_limit = student_limit;
        }
        if let Some(days) = payload.limit_duration_days {
            item.limit_duration_days = days;
        }
        if let Some(minutes) = payload.limit_duration_minutes {
            item.limit_duration_minutes = minutes;
        }
        if let Some(unit) = payload.unit {
            item.unit = unit;
        }
        if let Some(is_weighed) = payload.is_weighed {
            item.is_weighed = is_weighed;
        }
        if let Some(barcode) = payload.barcode {
            item.barcode = Some(barcode);
        }

        self.store.replace_item(&item)?;

        let added = item.quantity - old_quantity;
        if added > 0.0 {
            self.record_inbound(&item, added, now_ms)?;
        }
        Ok(item)
    }

    fn record_inbound(
        &self,
        item: &InventoryItem,
        quantity: f64,
        now_ms: i64,
    ) -> Result<(), IntakeError> {
        self.store.append_transaction(&Transaction {
            id: util::transaction_id(),
            kind: TransactionKind::In,
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            quantity,
            actor: self.actor.clone(),
            timestamp: now_ms,
            unit: item.unit,
        })?;
        Ok(())
    }
}
