//! Per-item eligibility checks
//!
//! Decides whether a (student, item, quantity) request may proceed given
//! current stock, the per-student limit, and the cooldown window evaluated
//! against the checkout ledger. [`check_eligibility`] is a pure function of
//! its inputs so the cart UI can call it repeatedly without touching any
//! store; [`precheck_cart`] is the store-backed convenience used right
//! before submission.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use shared::format;
use shared::models::{CheckoutRecord, InventoryItem, Unit};

use crate::repository::{InventoryRepository, LedgerRepository};
use crate::storage::StorageError;

const MS_PER_MINUTE: i64 = 60 * 1000;

/// Why a request was denied
///
/// Ordered by check priority: an out-of-stock item reports
/// `InsufficientStock` even when a cooldown is also active.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Denial {
    #[error("Item not found")]
    ItemNotFound { item_id: String },

    #[error("Not enough quantity in stock")]
    InsufficientStock { available: f64, unit: Unit },

    #[error("Limited to {}", format::quantity_with_unit(*.limit, *.unit))]
    LimitExceeded { limit: f64, unit: Unit },

    #[error("{}", format::remaining_time(*.remaining_minutes))]
    CooldownActive { remaining_minutes: i64 },
}

impl Denial {
    /// Quantity the student could still request, if the denial implies one.
    pub fn available_quantity(&self) -> Option<f64> {
        match self {
            Self::InsufficientStock { available, .. } => Some(*available),
            Self::LimitExceeded { limit, .. } => Some(*limit),
            _ => None,
        }
    }

    /// Minutes until the cooldown lapses, for `CooldownActive`.
    pub fn remaining_minutes(&self) -> Option<i64> {
        match self {
            Self::CooldownActive { remaining_minutes } => Some(*remaining_minutes),
            _ => None,
        }
    }
}

/// The most recent ledger record for (student, item), if any.
///
/// When several records share the maximum timestamp the first one in ledger
/// order wins; the choice is unspecified and does not affect the cooldown
/// outcome since remaining time depends on the timestamp alone.
fn latest_checkout<'a>(
    ledger: &'a [CheckoutRecord],
    student_id: &str,
    item_id: &str,
) -> Option<&'a CheckoutRecord> {
    ledger
        .iter()
        .filter(|record| record.student_id == student_id && record.item_id == item_id)
        .fold(None, |latest: Option<&CheckoutRecord>, record| {
            match latest {
                Some(best) if record.timestamp > best.timestamp => Some(record),
                Some(best) => Some(best),
                None => Some(record),
            }
        })
}

/// Check whether a student may take `requested` of an item right now.
///
/// Checks run in order and short-circuit on the first failure:
///
/// 1. the item exists
/// 2. `requested` does not exceed current stock
/// 3. `requested` does not exceed the per-student limit
/// 4. the student's most recent checkout of this item (if any) is outside
///    the item's cooldown window
///
/// A zero-length window (`limit_duration_days == 0 &&
/// limit_duration_minutes == 0`) never restricts, regardless of history.
/// Pure function; safe for repeated cart pre-validation.
pub fn check_eligibility(
    student_id: &str,
    item_id: &str,
    requested: f64,
    item: Option<&InventoryItem>,
    ledger: &[CheckoutRecord],
    now_ms: i64,
) -> Result<(), Denial> {
    let Some(item) = item else {
        return Err(Denial::ItemNotFound {
            item_id: item_id.to_string(),
        });
    };

    if requested > item.quantity {
        debug!(
            student_id,
            item_id,
            requested,
            available = item.quantity,
            "eligibility denied: insufficient stock"
        );
        return Err(Denial::InsufficientStock {
            available: item.quantity,
            unit: item.unit,
        });
    }

    if requested > item.student_limit {
        debug!(
            student_id,
            item_id,
            requested,
            limit = item.student_limit,
            "eligibility denied: over per-student limit"
        );
        return Err(Denial::LimitExceeded {
            limit: item.student_limit,
            unit: item.unit,
        });
    }

    let restriction_minutes = item.restriction_minutes();
    if restriction_minutes == 0 {
        return Ok(());
    }

    if let Some(latest) = latest_checkout(ledger, student_id, item_id) {
        let restriction_ms = restriction_minutes * MS_PER_MINUTE;
        let elapsed_ms = now_ms - latest.timestamp;
        if elapsed_ms < restriction_ms {
            let remaining_minutes =
                ((restriction_ms - elapsed_ms) as f64 / MS_PER_MINUTE as f64).ceil() as i64;
            debug!(
                student_id,
                item_id, remaining_minutes, "eligibility denied: cooldown active"
            );
            return Err(Denial::CooldownActive { remaining_minutes });
        }
    }

    Ok(())
}

/// Pre-validate a whole cart against the store.
///
/// Returns one denial per failing line, keyed by item id; an empty map
/// means every line may proceed. Reads only, never mutates.
pub fn precheck_cart<S>(
    store: &S,
    student_id: &str,
    lines: &[(String, f64)],
    now_ms: i64,
) -> Result<BTreeMap<String, Denial>, StorageError>
where
    S: InventoryRepository + LedgerRepository,
{
    let mut denials = BTreeMap::new();
    for (item_id, requested) in lines {
        let item = store.get_item(item_id)?;
        let ledger = store.checkouts_for(student_id, item_id)?;
        if let Err(denial) =
            check_eligibility(student_id, item_id, *requested, item.as_ref(), &ledger, now_ms)
        {
            denials.insert(item_id.clone(), denial);
        }
    }
    Ok(denials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk(quantity: f64, student_limit: f64, days: i64, minutes: i64) -> InventoryItem {
        InventoryItem {
            id: "6".into(),
            name: "Milk".into(),
            category: "dairy".into(),
            quantity,
            student_limit,
            limit_duration_days: days,
            limit_duration_minutes: minutes,
            unit: Unit::Item,
            is_weighed: false,
            barcode: None,
        }
    }

    fn record(student: &str, item: &str, at_ms: i64) -> CheckoutRecord {
        CheckoutRecord {
            student_id: student.into(),
            item_id: item.into(),
            quantity: 1.0,
            timestamp: at_ms,
            unit: Unit::Item,
        }
    }

    #[test]
    fn test_missing_item_denied() {
        let result = check_eligibility("s1", "404", 1.0, None, &[], 0);
        assert_eq!(
            result,
            Err(Denial::ItemNotFound {
                item_id: "404".into()
            })
        );
    }

    #[test]
    fn test_insufficient_stock_reports_available() {
        let item = milk(3.0, 5.0, 0, 0);
        let err = check_eligibility("s1", "6", 4.0, Some(&item), &[], 0).unwrap_err();
        assert_eq!(
            err,
            Denial::InsufficientStock {
                available: 3.0,
                unit: Unit::Item
            }
        );
        assert_eq!(err.available_quantity(), Some(3.0));
    }

    #[test]
    fn test_stock_check_runs_before_limit_check() {
        // Request exceeds both stock and limit: stock wins
        let item = milk(2.0, 1.0, 7, 0);
        let err = check_eligibility("s1", "6", 5.0, Some(&item), &[], 0).unwrap_err();
        assert!(matches!(err, Denial::InsufficientStock { .. }));
    }

    #[test]
    fn test_limit_exceeded_regardless_of_history() {
        let item = milk(50.0, 2.0, 0, 0);
        let err = check_eligibility("s1", "6", 3.0, Some(&item), &[], 0).unwrap_err();
        assert_eq!(
            err,
            Denial::LimitExceeded {
                limit: 2.0,
                unit: Unit::Item
            }
        );
        assert_eq!(err.available_quantity(), Some(2.0));
        assert_eq!(err.to_string(), "Limited to 2 items");
    }

    #[test]
    fn test_no_history_never_cooldown() {
        let item = milk(10.0, 2.0, 7, 0);
        assert!(check_eligibility("s1", "6", 1.0, Some(&item), &[], 0).is_ok());
    }

    #[test]
    fn test_other_students_history_ignored() {
        let item = milk(10.0, 2.0, 7, 0);
        let ledger = vec![record("s2", "6", 0)];
        assert!(check_eligibility("s1", "6", 1.0, Some(&item), &ledger, 1).is_ok());
    }

    #[test]
    fn test_cooldown_boundary() {
        // 30-minute window, checkout at t0
        let item = milk(10.0, 2.0, 0, 30);
        let t0 = 1_000_000;
        let ledger = vec![record("s1", "6", t0)];

        // 29 minutes later: denied, about 1 minute remaining
        let err =
            check_eligibility("s1", "6", 1.0, Some(&item), &ledger, t0 + 29 * MS_PER_MINUTE)
                .unwrap_err();
        assert_eq!(err, Denial::CooldownActive { remaining_minutes: 1 });
        assert_eq!(err.to_string(), "Available in 1 minute");

        // Exactly 30 minutes later: allowed
        assert!(
            check_eligibility("s1", "6", 1.0, Some(&item), &ledger, t0 + 30 * MS_PER_MINUTE)
                .is_ok()
        );
    }

    #[test]
    fn test_cooldown_remaining_rounds_up() {
        let item = milk(10.0, 2.0, 0, 30);
        let t0 = 0;
        let ledger = vec![record("s1", "6", t0)];

        // 10.5 minutes elapsed of a 30-minute window: 19.5 left, reported as 20
        let now = t0 + 10 * MS_PER_MINUTE + 30 * 1000;
        let err = check_eligibility("s1", "6", 1.0, Some(&item), &ledger, now).unwrap_err();
        assert_eq!(err.remaining_minutes(), Some(20));
    }

    #[test]
    fn test_day_window_counts_in_minutes() {
        let item = milk(10.0, 2.0, 7, 0);
        let t0 = 0;
        let ledger = vec![record("s1", "6", t0)];

        let six_days = 6 * 24 * 60 * MS_PER_MINUTE;
        let err = check_eligibility("s1", "6", 1.0, Some(&item), &ledger, t0 + six_days)
            .unwrap_err();
        assert_eq!(err.remaining_minutes(), Some(24 * 60));
    }

    #[test]
    fn test_zero_window_means_no_restriction() {
        let item = milk(10.0, 2.0, 0, 0);
        // Checkout one millisecond ago, and even a record in the future
        let ledger = vec![record("s1", "6", 999), record("s1", "6", 2_000)];
        assert!(check_eligibility("s1", "6", 1.0, Some(&item), &ledger, 1_000).is_ok());
    }

    #[test]
    fn test_latest_record_wins() {
        let item = milk(10.0, 2.0, 0, 30);
        // Old record far in the past, fresh one 5 minutes ago
        let now = 100 * MS_PER_MINUTE;
        let ledger = vec![
            record("s1", "6", 0),
            record("s1", "6", now - 5 * MS_PER_MINUTE),
        ];
        let err = check_eligibility("s1", "6", 1.0, Some(&item), &ledger, now).unwrap_err();
        assert_eq!(err.remaining_minutes(), Some(25));
    }

    #[test]
    fn test_precheck_cart_collects_denials_per_line() {
        use crate::memory::MemoryStore;

        let store = MemoryStore::with_items([milk(1.0, 2.0, 0, 0)]);
        let lines = vec![
            ("6".to_string(), 1.0),   // fine
            ("6".to_string(), 5.0),   // over stock
            ("404".to_string(), 1.0), // unknown item
        ];
        let denials = precheck_cart(&store, "s1", &lines, 0).unwrap();

        // Same item id appears twice; the failing line's denial is kept
        assert_eq!(denials.len(), 2);
        assert!(matches!(
            denials.get("6"),
            Some(Denial::InsufficientStock { .. })
        ));
        assert!(matches!(denials.get("404"), Some(Denial::ItemNotFound { .. })));
    }
}
