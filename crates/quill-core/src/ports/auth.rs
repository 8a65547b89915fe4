//! Admin authentication port.

/// One-way hashing for the admin key.
///
/// The server only ever stores the hash; incoming keys are verified against it.
pub trait KeyHasher: Send + Sync {
    /// Hash a plain text key.
    fn hash(&self, key: &str) -> Result<String, AuthError>;

    /// Verify a key against a hash.
    fn verify(&self, key: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Admin access is not configured")]
    NotConfigured,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
