//! User service for business logic.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use super::models::{CreateUserRequest, UpdateUserRequest, User};
use super::repository::UserRepository;
use crate::auth::Role;

const MIN_PASSWORD_LEN: usize = 6;

/// Service for user management operations.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Create a new user with validation. New users get the standard role.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        if !is_valid_username(&request.username) {
            bail!(
                "Invalid username format. Must be 3-50 characters: letters, digits, dots, underscores, or hyphens."
            );
        }

        if !is_valid_email(&request.email) {
            bail!("Invalid email format.");
        }

        if request.password.len() < MIN_PASSWORD_LEN {
            bail!("Invalid password. Must be at least {MIN_PASSWORD_LEN} characters.");
        }

        if !self.repo.is_username_available(&request.username).await? {
            bail!("Invalid username: '{}' is already taken.", request.username);
        }

        if !self.repo.is_email_available(&request.email).await? {
            bail!("Invalid email: '{}' is already registered.", request.email);
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repo
            .create(
                &request.username,
                &request.email,
                &password_hash,
                Role::Standard,
            )
            .await?;

        info!(user_id = user.id, username = %user.username, "Created new user");
        Ok(user)
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.repo.get(id).await
    }

    /// List all users.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    /// Update a user. Password updates are re-hashed before storage.
    #[instrument(skip(self, request))]
    pub async fn update_user(&self, id: i64, request: UpdateUserRequest) -> Result<User> {
        if let Some(username) = &request.username {
            if !is_valid_username(username) {
                bail!("Invalid username format.");
            }
            if let Some(existing) = self.repo.get_by_username(username).await?
                && existing.id != id
            {
                bail!("Invalid username: '{}' is already taken.", username);
            }
        }

        if let Some(email) = &request.email {
            if !is_valid_email(email) {
                bail!("Invalid email format.");
            }
            if let Some(existing) = self.repo.get_by_email(email).await?
                && existing.id != id
            {
                bail!("Invalid email: '{}' is already registered.", email);
            }
        }

        let mut processed = request;
        if let Some(password) = &processed.password {
            if password.len() < MIN_PASSWORD_LEN {
                bail!("Invalid password. Must be at least {MIN_PASSWORD_LEN} characters.");
            }
            processed.password = Some(hash_password(password)?);
        }

        let user = self.repo.update(id, processed).await?;
        info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    /// Delete a user.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Verify a username/password pair. Returns the user on success.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.repo.get_by_username(username).await? else {
            return Ok(None);
        };

        if bcrypt::verify(password, &user.password_hash).unwrap_or(false) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=50).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn is_valid_email(email: &str) -> bool {
    // Cheap structural check; real validation is delivery.
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_service() -> UserService {
        let db = Database::in_memory().await.unwrap();
        UserService::new(UserRepository::new(db.pool().clone()))
    }

    fn create_request(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: "password123".to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("john.doe"));
        assert!(is_valid_username("user_1-a"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(51)));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("john.doe@example.com"));
        assert!(!is_valid_email("john.doe"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@com"));
        assert!(!is_valid_email("john@.com"));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = setup_service().await;
        let user = service
            .create_user(create_request("john.doe", "john.doe@example.com"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$2"));
        assert_eq!(user.role(), Role::Standard);
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_payloads() {
        let service = setup_service().await;

        assert!(
            service
                .create_user(create_request("x", "x@example.com"))
                .await
                .is_err()
        );
        assert!(
            service
                .create_user(create_request("validname", "not-an-email"))
                .await
                .is_err()
        );

        let short_password = CreateUserRequest {
            password: "123".to_string(),
            ..create_request("validname", "valid@example.com")
        };
        assert!(service.create_user(short_password).await.is_err());
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates() {
        let service = setup_service().await;
        service
            .create_user(create_request("john.doe", "john.doe@example.com"))
            .await
            .unwrap();

        let err = service
            .create_user(create_request("john.doe", "other@example.com"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));

        let err = service
            .create_user(create_request("other", "john.doe@example.com"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let service = setup_service().await;
        let user = service
            .create_user(create_request("jane", "jane@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUserRequest {
                    password: Some("newpassword".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.password_hash, "newpassword");
        assert!(
            service
                .verify_credentials("jane", "newpassword")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let service = setup_service().await;
        service
            .create_user(create_request("john.doe", "john.doe@example.com"))
            .await
            .unwrap();

        assert!(
            service
                .verify_credentials("john.doe", "password123")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            service
                .verify_credentials("john.doe", "wrong")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            service
                .verify_credentials("nobody", "password123")
                .await
                .unwrap()
                .is_none()
        );
    }
}
