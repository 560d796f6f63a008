//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, NewCategory, map_category_row},
    database_id::CategoryId,
    stores::{CategoryStore, sqlite::lock},
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn select(&self, where_clause: &str) -> Result<Vec<Category>, Error> {
        lock(&self.connection)?
            .prepare(&format!(
                "SELECT id, name, icon, is_favorite FROM category {where_clause} ORDER BY id;"
            ))?
            .query_map([], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&self, category: NewCategory) -> Result<Category, Error> {
        let connection = lock(&self.connection)?;
        connection.execute(
            "INSERT INTO category (name, icon, is_favorite) VALUES (?1, ?2, ?3);",
            (category.name.as_ref(), &category.icon, category.is_favorite),
        )?;

        let id = connection.last_insert_rowid();
        tracing::debug!("Created category {} with ID {id}", category.name);

        Ok(Category {
            id,
            name: category.name,
            icon: category.icon,
            is_favorite: category.is_favorite,
        })
    }

    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.select("")
    }

    fn get_favorites(&self) -> Result<Vec<Category>, Error> {
        self.select("WHERE is_favorite = 1")
    }

    /// Set the favorite flag of a category.
    ///
    /// # Errors
    /// This function will return a [Error::NotFound] if `id` does not refer to
    /// a category, or a [Error::SqlError] if there is some other SQL error.
    fn update_favorite(&self, id: CategoryId, is_favorite: bool) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE category SET is_favorite = ?1 WHERE id = ?2;",
            (is_favorite, id),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
