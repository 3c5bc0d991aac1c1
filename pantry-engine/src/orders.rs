//! Order lifecycle
//!
//! Orders move through `pending -> fulfilled | cancelled`; both right-hand
//! states are terminal. Creating an order never touches stock. Fulfillment
//! validates every line against current stock first and only then commits:
//! stock decrements, one ledger record and one outbound transaction per
//! line, all stamped with the same timestamp.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use shared::models::{
    CheckoutRecord, InventoryItem, Order, OrderLineItem, OrderStatus, Transaction,
    TransactionKind, Unit,
};
use shared::util;

use crate::config::Config;
use crate::quantity;
use crate::repository::PantryStore;
use crate::storage::StorageError;

const MS_PER_MINUTE: i64 = 60 * 1000;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already fulfilled: {0}")]
    AlreadyFulfilled(String),

    #[error("Order already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error(
        "You've already placed an order recently. Please wait {remaining_minutes} minutes before placing another order."
    )]
    RateLimited { remaining_minutes: i64 },

    #[error("Not enough {item_name} in inventory")]
    InsufficientStock { item_name: String, available: f64 },
}

/// One requested line of a new order.
///
/// Category and unit are resolved from inventory at creation time so the
/// order carries a self-contained snapshot for display.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub item_id: String,
    pub item_name: String,
    pub quantity: f64,
}

/// Order state machine over an injected store.
///
/// Synchronous and single-writer: `fulfill_order` is validate-then-commit
/// across several store calls, which is only safe when no other writer can
/// interleave. Deployments with multiple staff terminals must serialize
/// calls externally (a mutex or single-writer task owning the store).
pub struct OrderLifecycle<'a, S: PantryStore> {
    store: &'a S,
    order_window_minutes: i64,
}

impl<'a, S: PantryStore> OrderLifecycle<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            order_window_minutes: config.order_window_minutes,
        }
    }

    /// Lifecycle with an explicit submission window (minutes).
    pub fn with_window(store: &'a S, order_window_minutes: i64) -> Self {
        Self {
            store,
            order_window_minutes,
        }
    }

    /// Minutes until the student may submit again, if their most recent
    /// order (any status) falls inside the submission window.
    pub fn recent_order_wait(&self, student_id: &str, now_ms: i64) -> Result<Option<i64>, OrderError> {
        let orders = self.store.orders_for(student_id)?;
        let Some(latest) = orders.iter().map(|o| o.created_at).max() else {
            return Ok(None);
        };

        let window_ms = self.order_window_minutes * MS_PER_MINUTE;
        let elapsed_ms = now_ms - latest;
        if elapsed_ms < window_ms {
            let remaining =
                ((window_ms - elapsed_ms) as f64 / MS_PER_MINUTE as f64).ceil() as i64;
            Ok(Some(remaining))
        } else {
            Ok(None)
        }
    }

    /// Submit a new pickup order.
    ///
    /// Applies the coarse per-student submission rate limit (independent of
    /// the per-item cooldowns, which belong to cart pre-validation), then
    /// appends a `Pending` order. No stock effect.
    pub fn create_order(
        &self,
        student_id: &str,
        lines: Vec<OrderLineInput>,
        now_ms: i64,
    ) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        for line in &lines {
            quantity::validate_line_quantity(line.quantity).map_err(OrderError::InvalidQuantity)?;
        }

        if let Some(remaining_minutes) = self.recent_order_wait(student_id, now_ms)? {
            debug!(student_id, remaining_minutes, "order submission rate limited");
            return Err(OrderError::RateLimited { remaining_minutes });
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            // Snapshot category/unit from inventory; a line for an unknown
            // item is still accepted here and will fail at fulfillment.
            let (category, unit) = match self.store.get_item(&line.item_id)? {
                Some(item) => (item.category, item.unit),
                None => ("unknown".to_string(), Unit::Item),
            };
            items.push(OrderLineItem {
                item_id: line.item_id,
                item_name: line.item_name,
                quantity: line.quantity,
                category,
                unit,
            });
        }

        let order = Order::pending(util::order_id(), student_id.to_string(), items, now_ms);
        self.store.append_order(&order)?;
        info!(
            order_id = %order.id,
            student_id,
            line_count = order.items.len(),
            "order created"
        );
        Ok(order)
    }

    /// Fulfill a pending order: all-or-nothing.
    ///
    /// Every line is validated against current stock before anything is
    /// written. On the first offending line the whole operation fails with
    /// no state change. Per-student limits and cooldowns are *not*
    /// re-verified here; those were checked at cart time.
    pub fn fulfill_order(&self, order_id: &str, now_ms: i64) -> Result<Order, OrderError> {
        let mut order = self
            .store
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        // Terminal guard before any mutation; a second fulfill call must
        // never decrement stock again.
        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Fulfilled => {
                return Err(OrderError::AlreadyFulfilled(order_id.to_string()));
            }
            OrderStatus::Cancelled => {
                return Err(OrderError::AlreadyCancelled(order_id.to_string()));
            }
        }

        // Phase 1: validate every line against a running per-item level so
        // an order repeating an item is checked in aggregate, not per line.
        // Each distinct item is fetched once; a missing item counts as zero
        // stock. `stocked` ends up holding the post-fulfillment quantity.
        let mut stocked: HashMap<String, (InventoryItem, f64)> = HashMap::new();
        for line in &order.items {
            if !stocked.contains_key(&line.item_id) {
                let Some(item) = self.store.get_item(&line.item_id)? else {
                    return Err(OrderError::InsufficientStock {
                        item_name: line.item_name.clone(),
                        available: 0.0,
                    });
                };
                let level = item.quantity;
                stocked.insert(line.item_id.clone(), (item, level));
            }
            if let Some((item, level)) = stocked.get_mut(&line.item_id) {
                if line.quantity > *level {
                    debug!(
                        order_id,
                        item_id = %line.item_id,
                        requested = line.quantity,
                        available = item.quantity,
                        "fulfillment rejected: insufficient stock"
                    );
                    return Err(OrderError::InsufficientStock {
                        item_name: line.item_name.clone(),
                        available: item.quantity,
                    });
                }
                *level = quantity::subtract_stock(*level, line.quantity);
            }
        }

        // Phase 2: commit. One stock write per distinct item, one ledger
        // record and one outbound transaction per line, all carrying the
        // same timestamp.
        for (item_id, (_, new_quantity)) in &stocked {
            self.store.set_item_quantity(item_id, *new_quantity)?;
        }
        for line in &order.items {
            let unit = stocked
                .get(&line.item_id)
                .map(|(item, _)| item.unit)
                .unwrap_or(Unit::Item);

            self.store.append_transaction(&Transaction {
                id: util::transaction_id(),
                kind: TransactionKind::Out,
                item_id: line.item_id.clone(),
                item_name: line.item_name.clone(),
                quantity: line.quantity,
                actor: order.student_id.clone(),
                timestamp: now_ms,
                unit,
            })?;

            self.store.append_checkout(&CheckoutRecord {
                student_id: order.student_id.clone(),
                item_id: line.item_id.clone(),
                quantity: line.quantity,
                timestamp: now_ms,
                unit,
            })?;
        }

        order.status = OrderStatus::Fulfilled;
        order.fulfilled_at = Some(now_ms);
        order.notified = true;
        self.store.replace_order(&order)?;

        info!(
            order_id,
            student_id = %order.student_id,
            line_count = order.items.len(),
            "order fulfilled"
        );
        Ok(order)
    }

    /// Cancel a pending order. Never touches inventory or the ledger.
    pub fn cancel_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let mut order = self
            .store
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Fulfilled => {
                return Err(OrderError::AlreadyFulfilled(order_id.to_string()));
            }
            OrderStatus::Cancelled => {
                return Err(OrderError::AlreadyCancelled(order_id.to_string()));
            }
        }

        order.status = OrderStatus::Cancelled;
        self.store.replace_order(&order)?;
        info!(order_id, student_id = %order.student_id, "order cancelled");
        Ok(order)
    }
}
