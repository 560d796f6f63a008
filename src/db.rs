//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    category::{create_category_table, seed_default_categories},
    transaction::create_transaction_table,
    user::create_user_table,
};

/// Create all of the database tables for the application.
///
/// The tables are created inside a single exclusive SQL transaction, so either
/// every table exists afterwards or none of them were created. Calling this
/// function on an already initialized database does nothing. The default
/// categories are added when the category table is empty.
///
/// # Errors
/// Returns an error if a table cannot be created or the SQL transaction
/// cannot be committed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}
