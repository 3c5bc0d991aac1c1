//! Pantry Engine
//!
//! Inventory, eligibility, and order-fulfillment engine for a campus
//! food pantry:
//!
//! - **eligibility**: pure per-item checks (stock, per-student limit,
//!   cooldown window) used for cart pre-validation
//! - **orders**: order lifecycle (`pending -> fulfilled | cancelled`) with
//!   all-or-nothing fulfillment that decrements stock and appends ledger
//!   and audit records
//! - **inventory**: staff intake (add/restock items, barcode lookup)
//! - **analytics**: per-product and per-category usage summaries
//! - **storage**: redb-backed persistence; **memory**: in-memory fake
//!
//! # Data flow
//!
//! ```text
//! Cart item           -> eligibility::check_eligibility   (no side effects)
//! Submission          -> OrderLifecycle::create_order     (pending, no stock effect)
//! Staff fulfillment   -> OrderLifecycle::fulfill_order    (validate all, then commit)
//! ```
//!
//! All operations take an explicit `now_ms` timestamp so tests are
//! deterministic; production callers pass [`shared::util::now_millis`].

pub mod analytics;
pub mod config;
pub mod eligibility;
pub mod inventory;
pub mod memory;
pub mod orders;
pub mod quantity;
pub mod repository;
pub mod storage;

// Re-exports
pub use config::Config;
pub use eligibility::{Denial, check_eligibility, precheck_cart};
pub use inventory::{Intake, IntakeError};
pub use memory::MemoryStore;
pub use orders::{OrderError, OrderLifecycle, OrderLineInput};
pub use repository::{
    InventoryRepository, LedgerRepository, OrderRepository, PantryStore, TransactionLog,
};
pub use storage::{PantryStorage, StorageError};
