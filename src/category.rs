//! Categories group transactions, e.g. 'Food', 'Transport', 'Salary'.
//!
//! A transaction refers to its category by name. Categories also carry an
//! icon name and a favorite flag, and favorites are offered first when adding
//! a transaction.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not blank.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,

    /// The name of the category.
    pub name: CategoryName,

    /// The name of the icon shown next to the category.
    pub icon: String,

    /// Whether the user marked the category as a favorite.
    pub is_favorite: bool,
}

/// The data needed to create a [Category].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// The name of the category.
    pub name: CategoryName,
    /// The name of the icon shown next to the category.
    pub icon: String,
    /// Whether the category starts out as a favorite.
    pub is_favorite: bool,
}

/// The categories created for a new user: name, icon and favorite flag.
pub const DEFAULT_CATEGORIES: [(&str, &str, bool); 8] = [
    ("Shopping", "shopping_cart", true),
    ("Food", "restaurant", true),
    ("Transport", "directions_car", true),
    ("Entertainment", "movie", false),
    ("Bills", "receipt", false),
    ("Health", "favorite", false),
    ("Education", "school", false),
    ("Gifts", "card_giftcard", false),
];

/// The icon used to display a transaction's category, matched case-insensitively.
pub fn category_icon(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "shopping" => "ic_shopping",
        "subscription" | "bills" => "ic_recurring_bill",
        "food" => "ic_restaurant",
        "salary" => "ic_salary",
        "transportation" => "ic_car",
        "income" => "ic_income",
        "expense" => "ic_expense",
        _ => "ic_camera",
    }
}

/// The ARGB colour used to display a category, matched case-insensitively.
pub fn category_color(category: &str) -> u32 {
    match category.to_lowercase().as_str() {
        "shopping" => 0xFF7B61FF,
        "subscription" => 0xFFFE774C,
        "food" => 0xFF00B2FF,
        "salary" | "income" => 0xFF00C48C,
        "transportation" => 0xFFFFB800,
        "entertainment" | "expense" => 0xFFFF6B6B,
        "health" => 0xFF4CAF50,
        "education" => 0xFF9C27B0,
        "bills" => 0xFFE91E63,
        _ => 0xFF607D8B,
    }
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Insert the [DEFAULT_CATEGORIES] if the category table is empty.
///
/// Returns the number of categories inserted.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_default_categories(connection: &Connection) -> Result<usize, rusqlite::Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM category;", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(0);
    }

    let mut statement =
        connection.prepare("INSERT INTO category (name, icon, is_favorite) VALUES (?1, ?2, ?3);")?;

    for (name, icon, is_favorite) in DEFAULT_CATEGORIES {
        statement.execute((name, icon, is_favorite))?;
    }

    Ok(DEFAULT_CATEGORIES.len())
}

/// Map a database row with the columns `id, name, icon, is_favorite` to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        icon: row.get(2)?,
        is_favorite: row.get(3)?,
    })
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_blank_string() {
        let category_name = CategoryName::new("  \t ");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}
