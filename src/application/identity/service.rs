//! User management service: application-layer orchestration
//!
//! HTTP handlers and the auth middleware are thin wrappers that delegate
//! to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, RepositoryProvider, UpdateUserDto, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Returned after a successful login or registration
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access_token: String,
    pub user: User,
}

/// User service: orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    fn issue_token(&self, user: User) -> DomainResult<AuthResult> {
        let access_token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;
        Ok(AuthResult { access_token, user })
    }

    fn hash(password: &str) -> DomainResult<String> {
        hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
    }

    fn check_password_len(password: &str) -> DomainResult<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check email + password and issue a token. Records the login time.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();

        let Some(user) = users.get_user_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on inactive account");
            return Err(DomainError::Unauthorized("User is inactive".into()));
        }

        let now = Utc::now();
        users.touch_last_login(&user.id, now).await?;

        info!(user_id = %user.id, "User logged in");
        self.issue_token(User {
            last_login: Some(now),
            ..user
        })
    }

    /// Resolve a bearer token to its user.
    ///
    /// The user is reloaded on every call, so disabling an account revokes
    /// its outstanding tokens.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|e| DomainError::Unauthorized(format!("Invalid token: {}", e)))?;

        match self.repos.users().get_user_by_id(&claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(DomainError::Unauthorized("User is inactive".into())),
            None => Err(DomainError::Unauthorized("User not found".into())),
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the default role and log them in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<AuthResult> {
        Self::check_password_len(password)?;

        let users = self.repos.users();
        if users.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let user = users
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: Self::hash(password)?,
                role: None,
            })
            .await?;

        info!(user_id = %user.id, "New user registered");
        self.issue_token(user)
    }

    /// Create the first admin account when no user exists yet.
    ///
    /// Returns the created user, or `None` when users already exist.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        let users = self.repos.users();
        if users.count_users().await? > 0 {
            return Ok(None);
        }

        let admin = users
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: Self::hash(password)?,
                role: Some(UserRole::Admin),
            })
            .await?;

        info!(user_id = %admin.id, email = %admin.email, "Default admin created");
        Ok(Some(admin))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_users().await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id("User", id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Update name and/or email. Keeping one's own email is not a conflict.
    pub async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<User> {
        let users = self.repos.users();
        let current = self.get_user(id).await?;

        if let Some(email) = dto.email.as_deref() {
            if email != current.email && users.get_user_by_email(email).await?.is_some() {
                return Err(DomainError::Conflict("Email already registered".into()));
            }
        }

        users
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id("User", id))
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        Self::check_password_len(new_password)?;

        let user = self.get_user(user_id).await?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Validation("Current password is incorrect".into()));
        }

        let new_hash = Self::hash(new_password)?;
        self.repos
            .users()
            .update_user_password(user_id, &new_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Flip the active flag.
    pub async fn toggle_status(&self, id: &str) -> DomainResult<User> {
        let user = self.get_user(id).await?;
        let updated = self
            .repos
            .users()
            .set_active(id, !user.is_active)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id("User", id))?;

        info!(user_id = %id, is_active = updated.is_active, "User status toggled");
        Ok(updated)
    }
}
