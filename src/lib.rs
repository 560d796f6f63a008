//! Expense Tracker is a personal finance app for recording income and
//! expenses, grouping them into categories, and charting spending over time.
//!
//! This library provides the domain models, the SQLite backed stores, and the
//! view-models that drive the home dashboard and authentication screens. The
//! `tracker` binary is a thin command line front end over these view-models.

#![warn(missing_docs)]

mod config;
mod database_id;
mod db;
mod email;
mod logging;
mod password;
mod timezone;

pub mod auth;
pub mod category;
pub mod clock;
pub mod currency;
pub mod dashboard;
pub mod datetime;
pub mod stores;
pub mod transaction;
pub mod user;

pub use config::Config;
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use email::Email;
pub use logging::setup_logging;
pub use password::{PasswordHash, ValidatedPassword};
pub use timezone::get_local_offset;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The string used to sign up or sign in is not an email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// The email address used to sign up is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging. When
    /// communicating with the user this error should be replaced with a
    /// general error message.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty or blank title was used to create a transaction.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// A zero, negative or non-finite amount was used to create a transaction.
    #[error("transaction amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// An empty or blank string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A negative tax amount was used to create a transaction.
    #[error("tax cannot be negative, got {0}")]
    NegativeTax(f64),

    /// The transaction timestamp (in milliseconds since the Unix epoch) is
    /// either not a valid point in time or lies in the future.
    ///
    /// Transactions record events that have already happened, therefore
    /// future dates are not allowed.
    #[error("Invalid date or date is in future")]
    FutureDate(i64),

    /// A string could not be parsed as a transaction type.
    #[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
