//! SQLite backed implementations of the store traits.

mod category;
mod transaction;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

/// Creates the SQLite stores that share a single `connection`.
///
/// The caller should have already created the tables with
/// [initialize_db](crate::initialize_db).
pub fn create_stores(
    connection: Arc<Mutex<Connection>>,
) -> (SQLiteTransactionStore, SQLiteCategoryStore) {
    (
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteCategoryStore::new(connection),
    )
}

pub(crate) fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|_| Error::DatabaseLockError)
}
