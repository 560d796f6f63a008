//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Email, Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from transaction and category IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The email address the user signs in with.
    pub email: Email,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if `email` is already registered,
/// - or [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    email: Email,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2)",
        (email.as_str(), password_hash.as_str()),
    )?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email,
        password_hash,
    })
}

/// Get the user registered with `email`, or `None` if nobody has registered it.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email.as_str())], map_user_row)
        .optional()
        .map_err(|error| error.into())
}

/// Replace the password hash of the user registered with `email`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if `email` does not belong to a registered user,
/// - or [Error::SqlError] if another SQL related error occurred.
pub fn update_password(
    email: &Email,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE email = ?2",
        (password_hash.as_str(), email.as_str()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserId::new(row.get(0)?),
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Email, Error, PasswordHash};

    use super::{create_user, create_user_table, get_user_by_email, update_password};

    fn get_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        connection
    }

    fn email() -> Email {
        Email::new_unchecked("foo@bar.baz")
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(email(), password_hash.clone(), &connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, email());
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_duplicate_email_fails() {
        let connection = get_db_connection();
        create_user(email(), PasswordHash::new_unchecked("hunter2"), &connection).unwrap();

        let result = create_user(email(), PasswordHash::new_unchecked("hunter3"), &connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_by_email_finds_registered_user() {
        let connection = get_db_connection();
        let test_user =
            create_user(email(), PasswordHash::new_unchecked("hunter2"), &connection).unwrap();

        let retrieved_user = get_user_by_email(&email(), &connection).unwrap();

        assert_eq!(retrieved_user, Some(test_user));
    }

    #[test]
    fn get_user_by_email_returns_none_for_unknown_email() {
        let connection = get_db_connection();

        assert_eq!(get_user_by_email(&email(), &connection), Ok(None));
    }

    #[test]
    fn update_password_replaces_hash() {
        let connection = get_db_connection();
        let user = create_user(email(), PasswordHash::new_unchecked("old"), &connection).unwrap();
        let new_hash = PasswordHash::new_unchecked("new");

        update_password(&email(), &new_hash, &connection).unwrap();

        let updated = get_user_by_email(&email(), &connection).unwrap().unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_for_unknown_email() {
        let connection = get_db_connection();

        let result = update_password(&email(), &PasswordHash::new_unchecked("new"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }
}
