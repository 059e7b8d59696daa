//! Test utilities and common setup.

use axum::Router;
use usergate::api::{AppState, create_router};
use usergate::auth::{AuthState, Role, TokenCodec};
use usergate::db::Database;
use usergate::user::{User, UserRepository, UserService};

pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Test application: the real router over an in-memory database.
pub struct TestApp {
    pub router: Router,
    pub auth: AuthState,
    repo: UserRepository,
}

impl TestApp {
    /// Mint a token for an arbitrary identity (no user row required).
    pub fn token_for(&self, id: i64, username: &str, role: Role) -> String {
        self.auth
            .codec()
            .encode(id, username, None, role)
            .expect("encode test token")
    }

    /// Seed a user row directly through the repository (service-level
    /// creation always assigns the standard role).
    pub async fn seed_user(&self, username: &str, email: &str, password: &str, role: Role) -> User {
        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).expect("hash test password");
        self.repo
            .create(username, email, &password_hash, role)
            .await
            .expect("seed test user")
    }
}

/// Create a test application with all services initialized.
pub async fn test_app() -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");

    let repo = UserRepository::new(db.pool().clone());
    let users = UserService::new(repo.clone());
    let auth = AuthState::new(TokenCodec::new(TEST_SECRET, 3600));

    let router = create_router(AppState::new(users, auth.clone()));

    TestApp { router, auth, repo }
}
