//! Shared repository error vocabulary.
//!
//! Each entity exposes its own repository trait (see the `space`, `tenant`,
//! `payment`, and `user` modules); all of them report failures through this
//! enumeration. Callers treat anything other than `NotFound`/`Conflict` as
//! fatal for the current call — the services never retry.

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
