//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// Handles the creation and retrieval of transactions.
///
/// Every query returns transactions newest first, ordered by the time they
/// occurred.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// The store assigns the ID and records the creation time. Callers should
    /// validate `builder` first with [TransactionBuilder::validate].
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Retrieve every transaction.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery::default())
    }

    /// Retrieve the `limit` most recent transactions.
    fn get_recent(&self, limit: u64) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            limit: Some(limit),
            ..Default::default()
        })
    }

    /// Retrieve transactions whose title or category contains `text`,
    /// ignoring ASCII case.
    fn search(&self, text: &str) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            search: Some(text.to_owned()),
            ..Default::default()
        })
    }

    /// Retrieve transactions in the category named `category`.
    fn filter_by_category(&self, category: &str) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            category: Some(category.to_owned()),
            ..Default::default()
        })
    }

    /// Retrieve transactions of type `kind`.
    fn filter_by_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            kind: Some(kind),
            ..Default::default()
        })
    }

    /// Retrieve transactions that occurred between `start` and `end`
    /// (inclusive), both in milliseconds since the Unix epoch.
    fn filter_by_date_range(&self, start: i64, end: i64) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            date_range: Some(start..=end),
            ..Default::default()
        })
    }
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
///
/// Each field that is set narrows the results further.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions whose title or category contains this text.
    pub search: Option<String>,
    /// Include transactions in this category.
    pub category: Option<String>,
    /// Include transactions of this type.
    pub kind: Option<TransactionType>,
    /// Include transactions that occurred within this range of milliseconds
    /// since the Unix epoch (inclusive).
    pub date_range: Option<RangeInclusive<i64>>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
}
