use tokio::sync::watch;

use crate::auth::{AuthService, AuthState};

/// Drives the sign-in and sign-up screens.
///
/// Failures never escape as errors. They are published as [AuthState::Error]
/// with a message for the user.
pub struct AuthViewModel<A> {
    service: A,
    state: watch::Sender<AuthState>,
}

impl<A: AuthService> AuthViewModel<A> {
    /// Create the view-model, starting authenticated if `service` already has
    /// a signed in user.
    pub fn new(service: A) -> Self {
        let initial_state = match service.current_user() {
            Some(user) => AuthState::Authenticated(user.id),
            None => AuthState::Unauthenticated,
        };
        let (state, _) = watch::channel(initial_state);

        Self { service, state }
    }

    /// Receive every new [AuthState].
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The latest [AuthState].
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Sign in with `email` and `password`, returning the resulting state.
    pub fn sign_in(&self, email: &str, password: &str) -> AuthState {
        self.state.send_replace(AuthState::Loading);

        let state = match self.service.sign_in(email, password) {
            Ok(user) => AuthState::Authenticated(user.id),
            Err(error) => AuthState::Error(error.to_string()),
        };

        self.publish(state)
    }

    /// Register with `email` and `password`, returning the resulting state.
    pub fn sign_up(&self, email: &str, password: &str) -> AuthState {
        self.state.send_replace(AuthState::Loading);

        let state = match self.service.sign_up(email, password) {
            Ok(user) => AuthState::Authenticated(user.id),
            Err(error) => AuthState::Error(error.to_string()),
        };

        self.publish(state)
    }

    /// Sign out, returning the resulting state.
    pub fn sign_out(&self) -> AuthState {
        let state = match self.service.sign_out() {
            Ok(()) => AuthState::Unauthenticated,
            Err(error) => AuthState::Error(error.to_string()),
        };

        self.publish(state)
    }

    fn publish(&self, state: AuthState) -> AuthState {
        if let AuthState::Error(message) = &state {
            tracing::warn!("Authentication failed: {message}");
        }

        self.state.send_replace(state.clone());

        state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        auth::{AuthService, AuthState, SQLiteAuthService},
        db::initialize,
    };

    use super::AuthViewModel;

    const PASSWORD: &str = "asomewhatlongpassword1";

    fn get_service() -> SQLiteAuthService {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteAuthService::with_hash_cost(Arc::new(Mutex::new(connection)), 4)
    }

    #[test]
    fn starts_unauthenticated() {
        let view_model = AuthViewModel::new(get_service());

        assert_eq!(view_model.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn starts_authenticated_when_user_is_signed_in() {
        let service = get_service();
        let user = service.sign_up("foo@bar.baz", PASSWORD).unwrap();

        let view_model = AuthViewModel::new(service);

        assert_eq!(view_model.state(), AuthState::Authenticated(user.id));
    }

    #[test]
    fn sign_up_then_sign_out() {
        let view_model = AuthViewModel::new(get_service());

        let signed_up = view_model.sign_up("foo@bar.baz", PASSWORD);
        assert!(matches!(signed_up, AuthState::Authenticated(_)));

        assert_eq!(view_model.sign_out(), AuthState::Unauthenticated);
        assert_eq!(view_model.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn failed_sign_in_publishes_error() {
        let view_model = AuthViewModel::new(get_service());
        let mut receiver = view_model.subscribe();

        let state = view_model.sign_in("foo@bar.baz", PASSWORD);

        assert_eq!(
            state,
            AuthState::Error("invalid email or password".to_owned())
        );
        assert_eq!(*receiver.borrow_and_update(), state);
    }
}
