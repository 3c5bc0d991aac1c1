//! redb-based storage layer
//!
//! The original deployment kept every collection in the browser's local
//! storage; here each collection gets its own redb table with
//! JSON-serialized values.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `items` | `item_id` | `InventoryItem` | Inventory |
//! | `orders` | `order_id` | `Order` | Pickup orders |
//! | `checkouts` | `sequence` | `CheckoutRecord` | Cooldown ledger (append-only) |
//! | `transactions` | `sequence` | `Transaction` | Audit trail (append-only) |
//! | `sequence_counter` | name | `u64` | Append sequences |
//!
//! # Durability
//!
//! Every mutation runs in its own write transaction. The engine assumes a
//! single writer (one staff terminal); see `OrderLifecycle::fulfill_order`
//! for the serialization requirement in multi-writer deployments.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

use shared::models::{CheckoutRecord, InventoryItem, Order, Transaction};

use crate::repository::{InventoryRepository, LedgerRepository, OrderRepository, TransactionLog};

/// Table for inventory items: key = item_id, value = JSON-serialized InventoryItem
const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("items");

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for the checkout ledger: key = sequence, value = JSON-serialized CheckoutRecord
const CHECKOUTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("checkouts");

/// Table for the audit trail: key = sequence, value = JSON-serialized Transaction
const TRANSACTIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("transactions");

/// Table for append sequences: key = counter name, value = next sequence
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const CHECKOUT_SEQ_KEY: &str = "checkout_seq";
const TRANSACTION_SEQ_KEY: &str = "transaction_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// redb-backed store implementing all repository traits.
#[derive(Clone)]
pub struct PantryStorage {
    db: Arc<Database>,
}

impl PantryStorage {
    /// Open (or create) the database at `path` and ensure all tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path)?;

        // Create tables up front so reads never hit a missing table.
        let txn = db.begin_write()?;
        {
            txn.open_table(ITEMS_TABLE)?;
            txn.open_table(ORDERS_TABLE)?;
            txn.open_table(CHECKOUTS_TABLE)?;
            txn.open_table(TRANSACTIONS_TABLE)?;
            txn.open_table(SEQUENCE_TABLE)?;
        }
        txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Find an item by its scan code. Linear scan; the pantry carries a few
    /// hundred items at most.
    pub fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>, StorageError> {
        Ok(self
            .all_items()?
            .into_iter()
            .find(|item| item.barcode.as_deref() == Some(barcode)))
    }

    fn put_keyed<T: serde::Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(table)?;
            t.insert(key, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get_keyed<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let txn = self.db.begin_read()?;
        let t = txn.open_table(table)?;
        match t.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn scan_keyed<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
    ) -> Result<Vec<T>, StorageError> {
        let txn = self.db.begin_read()?;
        let t = txn.open_table(table)?;
        let mut out = Vec::new();
        for entry in t.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }

    /// Append a JSON value to a sequence-keyed table within one transaction.
    fn append_sequenced<T: serde::Serialize>(
        &self,
        table: TableDefinition<u64, &[u8]>,
        seq_key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        let txn = self.db.begin_write()?;
        {
            let mut seq_table = txn.open_table(SEQUENCE_TABLE)?;
            let seq = seq_table.get(seq_key)?.map(|g| g.value()).unwrap_or(0);
            seq_table.insert(seq_key, seq + 1)?;

            let mut t = txn.open_table(table)?;
            t.insert(seq, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn scan_sequenced<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<u64, &[u8]>,
    ) -> Result<Vec<T>, StorageError> {
        let txn = self.db.begin_read()?;
        let t = txn.open_table(table)?;
        let mut out = Vec::new();
        for entry in t.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }
}

impl InventoryRepository for PantryStorage {
    fn get_item(&self, item_id: &str) -> Result<Option<InventoryItem>, StorageError> {
        self.get_keyed(ITEMS_TABLE, item_id)
    }

    fn all_items(&self) -> Result<Vec<InventoryItem>, StorageError> {
        self.scan_keyed(ITEMS_TABLE)
    }

    fn insert_item(&self, item: &InventoryItem) -> Result<(), StorageError> {
        self.put_keyed(ITEMS_TABLE, &item.id, item)
    }

    fn replace_item(&self, item: &InventoryItem) -> Result<(), StorageError> {
        self.put_keyed(ITEMS_TABLE, &item.id, item)
    }

    fn set_item_quantity(&self, item_id: &str, quantity: f64) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(ITEMS_TABLE)?;
            let updated = match t.get(item_id)? {
                Some(guard) => {
                    let mut item: InventoryItem = serde_json::from_slice(guard.value())?;
                    item.quantity = quantity;
                    Some(serde_json::to_vec(&item)?)
                }
                None => None,
            };
            if let Some(bytes) = updated {
                t.insert(item_id, bytes.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

impl LedgerRepository for PantryStorage {
    fn checkouts_for(
        &self,
        student_id: &str,
        item_id: &str,
    ) -> Result<Vec<CheckoutRecord>, StorageError> {
        let all: Vec<CheckoutRecord> = self.scan_sequenced(CHECKOUTS_TABLE)?;
        Ok(all
            .into_iter()
            .filter(|record| record.student_id == student_id && record.item_id == item_id)
            .collect())
    }

    fn append_checkout(&self, record: &CheckoutRecord) -> Result<(), StorageError> {
        self.append_sequenced(CHECKOUTS_TABLE, CHECKOUT_SEQ_KEY, record)
    }
}

impl OrderRepository for PantryStorage {
    fn get_order(&self, order_id: &str) -> Result<Option<Order>, StorageError> {
        self.get_keyed(ORDERS_TABLE, order_id)
    }

    fn orders_for(&self, student_id: &str) -> Result<Vec<Order>, StorageError> {
        let all: Vec<Order> = self.scan_keyed(ORDERS_TABLE)?;
        Ok(all
            .into_iter()
            .filter(|order| order.student_id == student_id)
            .collect())
    }

    fn all_orders(&self) -> Result<Vec<Order>, StorageError> {
        self.scan_keyed(ORDERS_TABLE)
    }

    fn append_order(&self, order: &Order) -> Result<(), StorageError> {
        self.put_keyed(ORDERS_TABLE, &order.id, order)
    }

    fn replace_order(&self, order: &Order) -> Result<(), StorageError> {
        self.put_keyed(ORDERS_TABLE, &order.id, order)
    }
}

impl TransactionLog for PantryStorage {
    fn append_transaction(&self, entry: &Transaction) -> Result<(), StorageError> {
        self.append_sequenced(TRANSACTIONS_TABLE, TRANSACTION_SEQ_KEY, entry)
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        self.scan_sequenced(TRANSACTIONS_TABLE)
    }
}
