//! Credential hashing.
//!
//! # Responsibilities
//! - One-way, salted hashing of passwords at registration
//! - Verifying a login attempt against the stored hash
//!
//! # Design Decisions
//! - Cost parameters are fixed at startup from `[auth]`
//! - Hashing is CPU-bound; callers run it on the blocking pool
//! - A mismatch is `Ok(false)`; `Err` is reserved for unusable input

pub mod hasher;

use thiserror::Error;

pub use hasher::Argon2Hasher;

/// Errors from the hashing primitive.
#[derive(Debug, Error)]
pub enum HashError {
    /// Cost parameters rejected by the algorithm.
    #[error("invalid hash parameters: {0}")]
    Params(String),

    /// Hashing the plaintext failed.
    #[error("hashing failed: {0}")]
    Hash(String),

    /// The stored credential is not a parseable hash string.
    #[error("malformed stored credential: {0}")]
    Malformed(String),
}

/// Hash/verify contract used by register and login.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    fn verify(&self, plaintext: &str, credential: &str) -> Result<bool, HashError>;
}
