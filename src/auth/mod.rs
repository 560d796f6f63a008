//! Signing up, signing in and signing out.
//!
//! [AuthService] is the seam to the user store, [SQLiteAuthService] keeps users
//! in the application database, and [AuthViewModel] publishes the resulting
//! [AuthState] for the sign-in screen.

mod sqlite;
mod view_model;

pub use sqlite::SQLiteAuthService;
pub use view_model::AuthViewModel;

use serde::Serialize;

use crate::{
    Error,
    user::{User, UserId},
};

/// Where the user is in the authentication flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuthState {
    /// A sign-in or sign-up request is in progress.
    Loading,
    /// The user with this ID is signed in.
    Authenticated(UserId),
    /// Nobody is signed in.
    Unauthenticated,
    /// The last request failed with this message.
    Error(String),
}

/// Registers users and keeps track of who is signed in.
pub trait AuthService {
    /// Sign in the user registered with `email`.
    ///
    /// Returns [Error::InvalidCredentials] if the email is not registered or
    /// the password does not match.
    fn sign_in(&self, email: &str, password: &str) -> Result<User, Error>;

    /// Register a new user and sign them in.
    ///
    /// Returns [Error::InvalidEmail], [Error::TooWeak] or
    /// [Error::DuplicateEmail] if the user cannot be registered.
    fn sign_up(&self, email: &str, password: &str) -> Result<User, Error>;

    /// Sign out the current user, if any.
    fn sign_out(&self) -> Result<(), Error>;

    /// The signed in user.
    fn current_user(&self) -> Option<User>;
}
