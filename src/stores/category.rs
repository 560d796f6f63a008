//! Defines the category store trait.

use crate::{
    Error,
    category::{Category, NewCategory},
    database_id::CategoryId,
};

/// Creates, retrieves and updates transaction categories.
pub trait CategoryStore {
    /// Create a new category.
    fn create(&self, category: NewCategory) -> Result<Category, Error>;

    /// Retrieve all categories in the order they were created.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Retrieve the categories marked as favorites.
    fn get_favorites(&self) -> Result<Vec<Category>, Error>;

    /// Set whether the category with `id` is a favorite.
    ///
    /// Returns [Error::NotFound] if no category has the ID `id`.
    fn update_favorite(&self, id: CategoryId, is_favorite: bool) -> Result<(), Error>;
}
