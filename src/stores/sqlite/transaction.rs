//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    clock::{Clock, SystemClock},
    database_id::TransactionId,
    datetime::to_millis,
    stores::{TransactionQuery, TransactionStore, sqlite::lock},
    transaction::{TRANSACTION_COLUMNS, Transaction, TransactionBuilder, map_transaction_row},
};

/// Stores transactions in a SQLite database.
///
/// New transactions are stamped with the time reported by `clock`.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore<C = SystemClock> {
    connection: Arc<Mutex<Connection>>,
    clock: C,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection` that reads the system clock.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self::with_clock(connection, SystemClock::default())
    }
}

impl<C: Clock> SQLiteTransactionStore<C> {
    /// Create a new store for the SQLite `connection` that reads `clock`.
    pub fn with_clock(connection: Arc<Mutex<Connection>>, clock: C) -> Self {
        Self { connection, clock }
    }
}

impl<C: Clock> TransactionStore for SQLiteTransactionStore<C> {
    /// Create a new transaction in the database, stamped with the current time.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let created_at = to_millis(self.clock.now());

        let transaction = lock(&self.connection)?
            .prepare(&format!(
                "INSERT INTO \"transaction\" (title, amount, category, type, date, created_at, tax)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    &builder.title,
                    builder.amount,
                    &builder.category,
                    builder.kind,
                    builder.occurred_at,
                    created_at,
                    builder.tax,
                ),
                map_transaction_row,
            )?;

        tracing::info!(
            "Created {} transaction {} \"{}\"",
            transaction.kind,
            transaction.id,
            transaction.title
        );

        Ok(transaction)
    }

    /// Retrieve a transaction from the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        lock(&self.connection)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], map_transaction_row)
            .map_err(|error| error.into())
    }

    /// Query for transactions in the database, newest first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts =
            vec![format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"")];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(text) = query.search {
            let parameter = query_parameters.len() + 1;
            where_clause_parts.push(format!(
                "(title LIKE ?{parameter} ESCAPE '\\' OR category LIKE ?{parameter} ESCAPE '\\')"
            ));
            query_parameters.push(Value::Text(format!("%{}%", escape_like(&text))));
        }

        if let Some(category) = query.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category));
        }

        if let Some(kind) = query.kind {
            where_clause_parts.push(format!("type = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(kind.as_str().to_owned()));
        }

        if let Some(date_range) = query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Integer(*date_range.start()));
            query_parameters.push(Value::Integer(*date_range.end()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY date DESC, id DESC".to_owned());

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        lock(&self.connection)?
            .prepare(&query_string)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }
}

/// Escape the LIKE wildcards in `text` so they match literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}
