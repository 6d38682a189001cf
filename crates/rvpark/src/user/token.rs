//! Opaque session tokens.
//!
//! The raw token is handed to the client once at login; only its SHA-256
//! hash is stored, so a leaked token table cannot be replayed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// A stored session token, keyed by the hash of its raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_hash: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Generate a 32-byte random token; returns `(raw, hash)`.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes[..]);
    let raw = URL_SAFE_NO_PAD.encode(bytes);
    let hash = hash_token(&raw);
    (raw, hash)
}

/// SHA-256 hash of a raw token, hex-encoded. This is the stored value.
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
