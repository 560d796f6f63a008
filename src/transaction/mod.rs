//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Validation of new transactions entered by the user
//! - Database functions for creating the transaction table and mapping rows
//! - Grouping transactions by day for display

mod core;
mod grouping;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction_table,
    map_transaction_row, parse_amount,
};
pub use grouping::{DayGroup, group_by_day};

pub(crate) use core::TRANSACTION_COLUMNS;
