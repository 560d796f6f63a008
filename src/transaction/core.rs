//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId, datetime};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string used for this type in the database and in type filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are immutable once stored. To create a new `Transaction`, use
/// [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned. Always positive, the direction
    /// is given by `kind`.
    pub amount: f64,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionType,
    /// When the transaction happened, in milliseconds since the Unix epoch.
    pub occurred_at: i64,
    /// When the transaction was recorded, in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Tax paid as part of the transaction.
    pub tax: f64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        category: &str,
        kind: TransactionType,
        occurred_at: i64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            kind,
            occurred_at,
            tax: 0.0,
        }
    }

    /// Whether the transaction is income.
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// When the transaction happened as a wall-clock date-time in `offset`.
    ///
    /// Returns `None` if `occurred_at` is not a valid point in time.
    pub fn local_occurred_at(&self, offset: UtcOffset) -> Option<PrimitiveDateTime> {
        datetime::local_date_time(self.occurred_at, offset)
    }
}

/// A builder for creating [Transaction] instances.
///
/// Call [TransactionBuilder::validate] before handing the builder to a
/// [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short description of the transaction, must not be blank.
    pub title: String,

    /// The amount of money spent or earned, must be greater than zero.
    pub amount: f64,

    /// The name of the category, must not be blank.
    pub category: String,

    /// Whether the transaction is income or an expense.
    pub kind: TransactionType,

    /// When the transaction happened, in milliseconds since the Unix epoch.
    ///
    /// Must not be later than the time the transaction is recorded.
    pub occurred_at: i64,

    /// Tax paid as part of the transaction. Defaults to zero.
    pub tax: f64,
}

impl TransactionBuilder {
    /// Set the tax for the transaction.
    pub fn tax(mut self, tax: f64) -> Self {
        self.tax = tax;
        self
    }

    /// Check the builder describes a transaction that can be stored.
    ///
    /// `now` is the current time in milliseconds since the Unix epoch.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] if the title is blank,
    /// - [Error::NonPositiveAmount] if the amount is not a finite number greater than zero,
    /// - [Error::EmptyCategoryName] if the category is blank,
    /// - [Error::NegativeTax] if the tax is negative,
    /// - or [Error::FutureDate] if `occurred_at` is invalid or later than `now`.
    pub fn validate(self, now: i64) -> Result<Self, Error> {
        if self.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        if !self.tax.is_finite() || self.tax < 0.0 {
            return Err(Error::NegativeTax(self.tax));
        }

        let is_valid_date = datetime::from_millis(self.occurred_at, UtcOffset::UTC).is_some()
            && self.occurred_at <= now;

        if !is_valid_date {
            return Err(Error::FutureDate(self.occurred_at));
        }

        Ok(self)
    }
}

/// Parse the amount typed into the add transaction form.
///
/// Blank input is rejected with `None`. Any other text that is not a number
/// becomes `0.0`, which validation then rejects.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Some(text.parse().unwrap_or(0.0))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, in the order expected by
/// [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, amount, category, type, date, created_at, tax";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                tax REAL NOT NULL DEFAULT 0
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Used by the date range and month queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        kind: row.get(4)?,
        occurred_at: row.get(5)?,
        created_at: row.get(6)?,
        tax: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
