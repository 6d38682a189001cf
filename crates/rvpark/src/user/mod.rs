//! Staff accounts, credential verification, opaque session tokens, and the
//! bearer-token middleware consumed by the HTTP layer.

pub mod auth;
pub mod bootstrap;
pub mod domain;
mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod token;

#[cfg(test)]
mod tests;

pub use auth::{require_auth, SharedTokenValidator, TokenValidator};
pub use bootstrap::{ensure_admin, ensure_staff};
pub use domain::{LoginCredentials, NewUser, Role, User};
pub use repository::{TokenRepository, UserRepository};
pub use router::{auth_router, user_router};
pub use service::{AuthError, UserService};
pub use token::{generate_token, hash_token, Token};
