use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::repository::RepositoryError;

use super::domain::{LoginCredentials, NewUser, User};
use super::password::{hash_password, verify_password};
use super::repository::{TokenRepository, UserRepository};
use super::token::{generate_token, hash_token, Token};

/// Staff accounts, credential verification, and session tokens.
pub struct UserService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    token_ttl: Duration,
}

impl<U, T> UserService<U, T>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    pub fn new(users: Arc<U>, tokens: Arc<T>, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }

    pub fn create_user(&self, new: NewUser, password: &str) -> Result<User, AuthError> {
        if new.email.trim().is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new.email,
            username: new.username,
            password_hash: hash_password(password)?,
            role: new.role,
            created_at: Utc::now(),
            last_login: None,
        };

        self.users.create(user.clone())?;
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.users
            .get(id)?
            .ok_or_else(|| AuthError::NotFound { id: id.to_string() })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User, AuthError> {
        self.users
            .get_by_email(email)?
            .ok_or_else(|| AuthError::NotFound {
                id: email.to_string(),
            })
    }

    pub fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list()?)
    }

    pub fn update_user(&self, user: User) -> Result<(), AuthError> {
        Ok(self.users.update(user)?)
    }

    /// Delete an account, revoking its sessions first so a deleted user's
    /// token can never validate against a recreated account.
    pub fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        self.tokens.revoke_all_for_user(id)?;
        Ok(self.users.delete(id)?)
    }

    /// Verify credentials and issue a session token. The raw token is
    /// returned exactly once; only its hash is stored.
    pub fn login(&self, creds: LoginCredentials) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .get_by_email(&creds.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&creds.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let (raw, token_hash) = generate_token();
        self.tokens.create(Token {
            token_hash,
            user_id: user.id.clone(),
            expires_at: now + self.token_ttl,
            created_at: now,
            revoked: false,
        })?;

        let mut user = user;
        user.last_login = Some(now);
        self.users.update(user.clone())?;

        Ok((user, raw))
    }

    /// Resolve a raw bearer token to its account, rejecting unknown,
    /// revoked, and expired sessions.
    pub fn validate_token(&self, raw: &str) -> Result<User, AuthError> {
        let stored = self
            .tokens
            .get(&hash_token(raw))?
            .ok_or(AuthError::TokenInvalid)?;

        if stored.revoked || stored.expires_at < Utc::now() {
            return Err(AuthError::TokenExpired);
        }

        self.users.get(&stored.user_id)?.ok_or(AuthError::NotFound {
            id: stored.user_id,
        })
    }

    pub fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut user = self.get_user(user_id)?;

        if !verify_password(old_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if new_password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        user.password_hash = hash_password(new_password)?;
        Ok(self.users.update(user)?)
    }

    /// Log out everywhere: revoke every session belonging to the user.
    pub fn revoke_all_tokens(&self, user_id: &str) -> Result<(), AuthError> {
        Ok(self.tokens.revoke_all_for_user(user_id)?)
    }
}

/// Errors surfaced by account and session operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token not recognized")]
    TokenInvalid,
    #[error("token is expired or revoked")]
    TokenExpired,
    #[error("user {id} not found")]
    NotFound { id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("cryptography error: {0}")]
    Crypto(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
