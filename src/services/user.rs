//! User service
//!
//! Accounts and login sessions:
//! - creating users (the bootstrap staff account, test fixtures)
//! - login/logout with opaque session tokens
//! - resolving a token back to its user, discarding expired sessions

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_SESSION_DAYS: i64 = 14;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Unknown user, wrong password or inactive account
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_days: i64,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, session_repo: Arc<dyn SessionRepository>) -> Self {
        Self::with_session_days(user_repo, session_repo, DEFAULT_SESSION_DAYS)
    }

    pub fn with_session_days(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_days,
        }
    }

    /// Create an active account with a hashed password.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_staff: bool,
    ) -> Result<User, UserServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }
        if self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(username.to_string()));
        }

        let mut user = User::new(username, hash_password(password)?);
        user.is_staff = is_staff;

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;
        tracing::info!(user_id = created.id, username = %created.username, "Created user");
        Ok(created)
    }

    /// Ensure a staff account named `username` exists, creating or promoting it.
    pub async fn ensure_staff_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        match self.get_by_username(username).await? {
            Some(user) if user.is_staff => Ok(user),
            Some(user) => self.set_staff(user, true).await,
            None => self.create_user(username, password, true).await,
        }
    }

    pub async fn set_staff(&self, mut user: User, is_staff: bool) -> Result<User, UserServiceError> {
        user.is_staff = is_staff;
        let updated = self
            .user_repo
            .update(&user)
            .await
            .context("Failed to update user")?;
        Ok(updated)
    }

    /// Disable an account and end all of its sessions.
    pub async fn deactivate(&self, mut user: User) -> Result<User, UserServiceError> {
        user.is_active = false;
        let updated = self
            .user_repo
            .update(&user)
            .await
            .context("Failed to update user")?;
        self.session_repo
            .delete_by_user(user.id)
            .await
            .context("Failed to delete user sessions")?;
        tracing::info!(user_id = user.id, "Deactivated user");
        Ok(updated)
    }

    pub async fn has_users(&self) -> Result<bool, UserServiceError> {
        Ok(self.user_repo.count().await.context("Failed to count users")? > 0)
    }

    /// Verify credentials and open a new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, UserServiceError> {
        let invalid = || {
            UserServiceError::AuthenticationError("Invalid username or password".to_string())
        };

        let user = match self.get_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %username, "Login failed: unknown user");
                return Err(invalid());
            }
        };

        if !verify_password(password, &user.password_hash).context("Failed to verify password")? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(invalid());
        }

        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login failed: inactive account");
            return Err(invalid());
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            expires_at: now + Duration::days(self.session_days),
            created_at: now,
        };
        let session = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(session)
    }

    pub async fn logout(&self, session_id: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// The active user behind `token`, if the session exists and has not expired.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;
        Ok(user.filter(|u| u.is_active))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to get user by username")?)
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64, UserServiceError> {
        Ok(self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations, DynDatabasePool};

    async fn setup() -> (DynDatabasePool, UserService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();
        let service = UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
        );
        (pool, service)
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let (_pool, service) = setup().await;
        let user = service.create_user("patrick", "password", false).await.unwrap();

        assert!(user.id > 0);
        assert!(!user.is_staff);
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let (_pool, service) = setup().await;
        assert!(matches!(
            service.create_user("  ", "password", false).await,
            Err(UserServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_user("patrick", "", false).await,
            Err(UserServiceError::ValidationError(_))
        ));

        service.create_user("patrick", "password", false).await.unwrap();
        assert!(matches!(
            service.create_user("patrick", "other", false).await,
            Err(UserServiceError::UserExists(_))
        ));
    }

    #[tokio::test]
    async fn test_login_and_validate_session() {
        let (_pool, service) = setup().await;
        let user = service.create_user("patrick", "password", false).await.unwrap();

        let session = service.login("patrick", "password").await.unwrap();
        assert_eq!(session.user_id, user.id);

        let resolved = service.validate_session(&session.id).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        service.logout(&session.id).await.unwrap();
        assert!(service.validate_session(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (_pool, service) = setup().await;
        service.create_user("patrick", "password", false).await.unwrap();

        assert!(matches!(
            service.login("patrick", "wrong").await,
            Err(UserServiceError::AuthenticationError(_))
        ));
        assert!(matches!(
            service.login("nobody", "password").await,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let (pool, service) = setup().await;
        let user = service.create_user("patrick", "password", false).await.unwrap();

        let now = Utc::now();
        let stale = Session {
            id: "stale-token".to_string(),
            user_id: user.id,
            expires_at: now - Duration::minutes(5),
            created_at: now - Duration::days(30),
        };
        SqlxSessionRepository::new(pool.clone()).create(&stale).await.unwrap();

        assert!(service.validate_session("stale-token").await.unwrap().is_none());
        assert!(SqlxSessionRepository::new(pool)
            .get_by_id("stale-token")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_deactivate_ends_sessions_and_blocks_login() {
        let (_pool, service) = setup().await;
        assert!(!service.has_users().await.unwrap());
        let user = service.create_user("patrick", "password", false).await.unwrap();
        assert!(service.has_users().await.unwrap());

        let session = service.login("patrick", "password").await.unwrap();
        let user = service.deactivate(user).await.unwrap();
        assert!(!user.is_active);

        assert!(service.validate_session(&session.id).await.unwrap().is_none());
        assert!(matches!(
            service.login("patrick", "password").await,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_staff_user_promotes() {
        let (_pool, service) = setup().await;
        let user = service.create_user("jani", "password", false).await.unwrap();

        let staff = service.ensure_staff_user("jani", "ignored").await.unwrap();
        assert_eq!(staff.id, user.id);
        assert!(staff.is_staff);

        let created = service.ensure_staff_user("admin", "password").await.unwrap();
        assert!(created.is_staff);
    }
}
