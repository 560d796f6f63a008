//! Contains traits and implementations for objects that store transactions and categories.

mod category;
mod transaction;

pub mod sqlite;

pub use category::CategoryStore;
pub use transaction::{TransactionQuery, TransactionStore};
