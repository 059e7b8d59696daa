//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthState;
use crate::user::UserService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User service for user management.
    pub users: Arc<UserService>,
    /// Authentication state.
    pub auth: AuthState,
}

impl AppState {
    /// Create new application state.
    pub fn new(users: UserService, auth: AuthState) -> Self {
        Self {
            users: Arc::new(users),
            auth,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
