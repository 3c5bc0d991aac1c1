//! Shared types for the pantry system
//!
//! Domain models used across the engine crate plus id/time utilities
//! and display formatting for quantities and cooldown windows.

pub mod format;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    CheckoutRecord, InventoryItem, ItemCreate, ItemUpdate, Order, OrderLineItem, OrderStatus,
    Transaction, TransactionKind, Unit,
};
