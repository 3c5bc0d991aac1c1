//! Usage analytics
//!
//! Read-only summaries over the transaction log: which items move, how
//! fast, and how categories rank. Staff dashboards consume these.

use std::collections::HashMap;

use shared::models::{Transaction, TransactionKind};

use crate::repository::{InventoryRepository, TransactionLog};
use crate::storage::StorageError;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Per-item usage summary
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub current_stock: f64,
    /// Total quantity checked out
    pub total_taken: f64,
    /// Total quantity received through intake
    pub total_restocked: f64,
    /// Taken per day since the item's first transaction
    pub popularity_score: f64,
    /// Taken / restocked (denominator falls back to 1 only when the item
    /// has no intake records at all)
    pub turnover_rate: f64,
}

/// Per-item ranking within one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub item_id: String,
    pub name: String,
    pub total_taken: f64,
    pub current_stock: f64,
}

fn sum_quantity(txns: &[&Transaction], kind: TransactionKind) -> f64 {
    txns.iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.quantity)
        .sum()
}

/// Usage summary for every inventory item.
pub fn product_stats<S>(store: &S, now_ms: i64) -> Result<Vec<ProductStats>, StorageError>
where
    S: InventoryRepository + TransactionLog,
{
    let items = store.all_items()?;
    let transactions = store.all_transactions()?;

    let mut by_item: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for txn in &transactions {
        by_item.entry(txn.item_id.as_str()).or_default().push(txn);
    }

    let mut stats = Vec::with_capacity(items.len());
    for item in &items {
        let txns = by_item.get(item.id.as_str()).cloned().unwrap_or_default();
        let total_taken = sum_quantity(&txns, TransactionKind::Out);
        let total_restocked = sum_quantity(&txns, TransactionKind::In);

        let first_txn_ms = txns.iter().map(|t| t.timestamp).min().unwrap_or(now_ms);
        let days_since_first = ((now_ms - first_txn_ms) as f64 / MS_PER_DAY).max(1.0);

        stats.push(ProductStats {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            current_stock: item.quantity,
            total_taken,
            total_restocked,
            popularity_score: total_taken / days_since_first,
            turnover_rate: total_taken
                / if total_restocked > 0.0 {
                    total_restocked
                } else {
                    1.0
                },
        });
    }
    Ok(stats)
}

/// Items of one category ranked by total quantity taken, descending.
pub fn category_ranking<S>(store: &S, category: &str) -> Result<Vec<CategoryEntry>, StorageError>
where
    S: InventoryRepository + TransactionLog,
{
    let items = store.all_items()?;
    let transactions = store.all_transactions()?;

    let mut entries: Vec<CategoryEntry> = items
        .iter()
        .filter(|item| item.category == category)
        .map(|item| {
            let total_taken = transactions
                .iter()
                .filter(|t| t.item_id == item.id && t.kind == TransactionKind::Out)
                .map(|t| t.quantity)
                .sum();
            CategoryEntry {
                item_id: item.id.clone(),
                name: item.name.clone(),
                total_taken,
                current_stock: item.quantity,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_taken
            .partial_cmp(&a.total_taken)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(entries)
}
