//! In-memory store
//!
//! Implements every repository trait over plain collections behind an
//! `RwLock`. Used by the engine's own tests and useful as a scratch store
//! for demos; behavior matches [`PantryStorage`](crate::storage::PantryStorage)
//! exactly, minus durability.

use std::collections::HashMap;
use std::sync::RwLock;

use shared::models::{CheckoutRecord, InventoryItem, Order, Transaction};

use crate::repository::{InventoryRepository, LedgerRepository, OrderRepository, TransactionLog};
use crate::storage::StorageError;

#[derive(Default)]
struct Inner {
    items: HashMap<String, InventoryItem>,
    orders: Vec<Order>,
    checkouts: Vec<CheckoutRecord>,
    transactions: Vec<Transaction>,
}

/// In-memory fake of the pantry store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with items.
    pub fn with_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().expect("lock poisoned");
            for item in items {
                inner.items.insert(item.id.clone(), item);
            }
        }
        store
    }

    /// Find an item by its scan code.
    pub fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner
            .items
            .values()
            .find(|item| item.barcode.as_deref() == Some(barcode))
            .cloned())
    }
}

impl InventoryRepository for MemoryStore {
    fn get_item(&self, item_id: &str) -> Result<Option<InventoryItem>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.items.get(item_id).cloned())
    }

    fn all_items(&self) -> Result<Vec<InventoryItem>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.items.values().cloned().collect())
    }

    fn insert_item(&self, item: &InventoryItem) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn replace_item(&self, item: &InventoryItem) -> Result<(), StorageError> {
        self.insert_item(item)
    }

    fn set_item_quantity(&self, item_id: &str, quantity: f64) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(item) = inner.items.get_mut(item_id) {
            item.quantity = quantity;
        }
        Ok(())
    }
}

impl LedgerRepository for MemoryStore {
    fn checkouts_for(
        &self,
        student_id: &str,
        item_id: &str,
    ) -> Result<Vec<CheckoutRecord>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner
            .checkouts
            .iter()
            .filter(|record| record.student_id == student_id && record.item_id == item_id)
            .cloned()
            .collect())
    }

    fn append_checkout(&self, record: &CheckoutRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.checkouts.push(record.clone());
        Ok(())
    }
}

impl OrderRepository for MemoryStore {
    fn get_order(&self, order_id: &str) -> Result<Option<Order>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.orders.iter().find(|o| o.id == order_id).cloned())
    }

    fn orders_for(&self, student_id: &str) -> Result<Vec<Order>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner
            .orders
            .iter()
            .filter(|o| o.student_id == student_id)
            .cloned()
            .collect())
    }

    fn all_orders(&self) -> Result<Vec<Order>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.orders.clone())
    }

    fn append_order(&self, order: &Order) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.orders.push(order.clone());
        Ok(())
    }

    fn replace_order(&self, order: &Order) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(slot) = inner.orders.iter_mut().find(|o| o.id == order.id) {
            *slot = order.clone();
        }
        Ok(())
    }
}

impl TransactionLog for MemoryStore {
    fn append_transaction(&self, entry: &Transaction) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.transactions.push(entry.clone());
        Ok(())
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.transactions.clone())
    }
}
