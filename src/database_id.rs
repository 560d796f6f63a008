//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a transaction, assigned by the store in increasing order.
pub type TransactionId = DatabaseId;
/// The ID of a category.
pub type CategoryId = DatabaseId;
