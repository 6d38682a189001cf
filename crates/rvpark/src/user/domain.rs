use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

/// A staff account. The password hash never leaves the service layer —
/// serialization skips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Payload for creating an account; the password travels separately so it
/// is hashed exactly once, in the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}
