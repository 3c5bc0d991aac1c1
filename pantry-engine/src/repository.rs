//! Repository traits
//!
//! The engine never talks to a concrete store; eligibility, lifecycle,
//! intake, and analytics are written against these capability traits so a
//! production deployment can use the redb-backed [`PantryStorage`] and
//! tests the in-memory [`MemoryStore`].
//!
//! [`PantryStorage`]: crate::storage::PantryStorage
//! [`MemoryStore`]: crate::memory::MemoryStore

use shared::models::{CheckoutRecord, InventoryItem, Order, Transaction};

use crate::storage::StorageError;

/// Read/write access to the item collection.
///
/// Stock quantity must only be written by order fulfillment
/// (`set_item_quantity`) and staff intake (`insert_item` / `replace_item`).
pub trait InventoryRepository {
    fn get_item(&self, item_id: &str) -> Result<Option<InventoryItem>, StorageError>;
    fn all_items(&self) -> Result<Vec<InventoryItem>, StorageError>;
    fn insert_item(&self, item: &InventoryItem) -> Result<(), StorageError>;
    fn replace_item(&self, item: &InventoryItem) -> Result<(), StorageError>;
    fn set_item_quantity(&self, item_id: &str, quantity: f64) -> Result<(), StorageError>;
}

/// Append-only checkout history used for cooldown evaluation.
pub trait LedgerRepository {
    /// All records matching (student, item), in insertion order.
    fn checkouts_for(
        &self,
        student_id: &str,
        item_id: &str,
    ) -> Result<Vec<CheckoutRecord>, StorageError>;
    fn append_checkout(&self, record: &CheckoutRecord) -> Result<(), StorageError>;
}

/// Read/write access to the order collection.
pub trait OrderRepository {
    fn get_order(&self, order_id: &str) -> Result<Option<Order>, StorageError>;
    fn orders_for(&self, student_id: &str) -> Result<Vec<Order>, StorageError>;
    fn all_orders(&self) -> Result<Vec<Order>, StorageError>;
    fn append_order(&self, order: &Order) -> Result<(), StorageError>;
    /// Persist a status transition for an existing order.
    fn replace_order(&self, order: &Order) -> Result<(), StorageError>;
}

/// Audit trail of stock movements. Not consulted for correctness.
pub trait TransactionLog {
    fn append_transaction(&self, entry: &Transaction) -> Result<(), StorageError>;
    fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError>;
}

/// Everything the order lifecycle needs from a backing store.
pub trait PantryStore:
    InventoryRepository + LedgerRepository + OrderRepository + TransactionLog
{
}

impl<T> PantryStore for T where
    T: InventoryRepository + LedgerRepository + OrderRepository + TransactionLog
{
}
