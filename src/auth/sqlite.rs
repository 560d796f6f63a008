use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Email, Error, PasswordHash, ValidatedPassword,
    auth::AuthService,
    stores::sqlite::lock,
    user::{User, create_user, get_user_by_email},
};

/// Authenticates users against the `user` table of a SQLite database.
///
/// The signed in user is only remembered for the lifetime of the service.
#[derive(Debug)]
pub struct SQLiteAuthService {
    connection: Arc<Mutex<Connection>>,
    current_user: Mutex<Option<User>>,
    hash_cost: u32,
}

impl SQLiteAuthService {
    /// Create an auth service that hashes passwords with [PasswordHash::DEFAULT_COST].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self::with_hash_cost(connection, PasswordHash::DEFAULT_COST)
    }

    /// Create an auth service that hashes passwords with `hash_cost` rounds of bcrypt.
    ///
    /// Low costs are only suitable for tests.
    pub fn with_hash_cost(connection: Arc<Mutex<Connection>>, hash_cost: u32) -> Self {
        Self {
            connection,
            current_user: Mutex::new(None),
            hash_cost,
        }
    }

    fn set_current_user(&self, user: Option<User>) -> Result<(), Error> {
        *self
            .current_user
            .lock()
            .map_err(|_| Error::DatabaseLockError)? = user;

        Ok(())
    }
}

impl AuthService for SQLiteAuthService {
    fn sign_in(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = Email::new(email)?;

        let user = get_user_by_email(&email, &*lock(&self.connection)?)?
            .ok_or(Error::InvalidCredentials)?;

        let is_password_valid = match user.password_hash.verify(password) {
            Ok(is_password_valid) => is_password_valid,
            Err(error) => {
                tracing::error!("Unhandled error while verifying credentials: {error}");
                return Err(error);
            }
        };

        if !is_password_valid {
            tracing::debug!("Wrong password for {email}");
            return Err(Error::InvalidCredentials);
        }

        tracing::info!("Signed in user {}", user.id);
        self.set_current_user(Some(user.clone()))?;

        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = Email::new(email)?;
        let password = ValidatedPassword::new(password, &[email.as_str()])?;
        let password_hash = PasswordHash::new(password, self.hash_cost)?;

        let user = create_user(email, password_hash, &*lock(&self.connection)?)?;

        tracing::info!("Registered user {}", user.id);
        self.set_current_user(Some(user.clone()))?;

        Ok(user)
    }

    fn sign_out(&self) -> Result<(), Error> {
        self.set_current_user(None)
    }

    fn current_user(&self) -> Option<User> {
        self.current_user
            .lock()
            .ok()
            .and_then(|current_user| current_user.clone())
    }
}
