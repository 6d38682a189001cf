use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;

use crate::repository::RepositoryError;
use crate::user::domain::{NewUser, Role, User};
use crate::user::repository::{TokenRepository, UserRepository};
use crate::user::service::UserService;
use crate::user::token::Token;

#[derive(Default, Clone)]
pub(super) struct MemoryUserRepository {
    records: Arc<Mutex<HashMap<String, User>>>,
}

impl UserRepository for MemoryUserRepository {
    fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&user.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(user.id.clone(), user);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&user.id) {
            guard.insert(user.id.clone(), user);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryTokenRepository {
    records: Arc<Mutex<HashMap<String, Token>>>,
}

impl MemoryTokenRepository {
    pub(super) fn tokens_for(&self, user_id: &str) -> Vec<Token> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .values()
            .filter(|token| token.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl TokenRepository for MemoryTokenRepository {
    fn create(&self, token: Token) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&token.token_hash) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(token.token_hash.clone(), token);
        Ok(())
    }

    fn get(&self, token_hash: &str) -> Result<Option<Token>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(token_hash).cloned())
    }

    fn revoke_all_for_user(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for token in guard.values_mut() {
            if token.user_id == user_id {
                token.revoked = true;
            }
        }
        Ok(())
    }
}

pub(super) fn service() -> (
    Arc<MemoryUserRepository>,
    Arc<MemoryTokenRepository>,
    UserService<MemoryUserRepository, MemoryTokenRepository>,
) {
    service_with_ttl(Duration::hours(24))
}

pub(super) fn service_with_ttl(
    ttl: Duration,
) -> (
    Arc<MemoryUserRepository>,
    Arc<MemoryTokenRepository>,
    UserService<MemoryUserRepository, MemoryTokenRepository>,
) {
    let users = Arc::new(MemoryUserRepository::default());
    let tokens = Arc::new(MemoryTokenRepository::default());
    let service = UserService::new(users.clone(), tokens.clone(), ttl);
    (users, tokens, service)
}

pub(super) fn staff_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        username: "frontdesk".to_string(),
        role: Role::Staff,
    }
}
