//! Password hashing and verification using Argon2id.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;

use super::service::AuthError;

/// Hash a plaintext password into PHC string format.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill(&mut salt_bytes[..]);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| AuthError::Crypto(format!("salt encoding: {err}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Crypto(format!("hashing failed: {err}")))
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch; `Err(AuthError::Crypto)` only when the
/// stored hash is malformed.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|err| AuthError::Crypto(format!("invalid hash format: {err}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(AuthError::Crypto(format!("verify error: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let hash = hash_password("hunter2").expect("hashing succeeds");
        assert!(verify_password("hunter2", &hash).expect("verification runs"));
    }

    #[test]
    fn rejects_wrong_password() {
        let hash = hash_password("hunter2").expect("hashing succeeds");
        assert!(!verify_password("hunter3", &hash).expect("verification runs"));
    }

    #[test]
    fn malformed_hash_is_a_crypto_error() {
        match verify_password("hunter2", "not-a-phc-string") {
            Err(AuthError::Crypto(_)) => {}
            other => panic!("expected crypto error, got {other:?}"),
        }
    }
}
