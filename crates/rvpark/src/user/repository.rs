use crate::repository::RepositoryError;

use super::domain::User;
use super::token::Token;

/// Storage abstraction for staff accounts.
pub trait UserRepository: Send + Sync {
    fn create(&self, user: User) -> Result<(), RepositoryError>;
    fn get(&self, id: &str) -> Result<Option<User>, RepositoryError>;
    fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn update(&self, user: User) -> Result<(), RepositoryError>;
    fn delete(&self, id: &str) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Storage abstraction for session tokens, keyed by token hash.
pub trait TokenRepository: Send + Sync {
    fn create(&self, token: Token) -> Result<(), RepositoryError>;
    fn get(&self, token_hash: &str) -> Result<Option<Token>, RepositoryError>;
    fn revoke_all_for_user(&self, user_id: &str) -> Result<(), RepositoryError>;
}
