//! Domain models
//!
//! Entity structs plus Create/Update payload structs for the staff-facing
//! intake operations. All models are serde-serializable; the storage layer
//! persists them as JSON values.

mod checkout;
mod item;
mod order;
mod transaction;

pub use checkout::CheckoutRecord;
pub use item::{InventoryItem, ItemCreate, ItemUpdate, Unit};
pub use order::{Order, OrderLineItem, OrderStatus};
pub use transaction::{Transaction, TransactionKind};
