//! Argon2 hashing for the admin API key.
//!
//! The plain key only exists on the operator's side. The server is configured
//! with its PHC string (`ADMIN_KEY_HASH`) and checks each bearer key against it.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use quill_core::ports::{AuthError, KeyHasher};

/// Shortest admin key `hash` accepts.
pub const MIN_KEY_LEN: usize = 16;

/// Argon2id hasher for the admin key.
pub struct Argon2KeyHasher {
    argon2: Argon2<'static>,
}

impl Argon2KeyHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Check that a configured hash is an Argon2 PHC string, so a typo in
    /// `ADMIN_KEY_HASH` is reported at startup rather than on every request.
    pub fn check_stored(&self, hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::HashingError(format!("ADMIN_KEY_HASH: {}", e)))?;
        if !parsed.algorithm.as_str().starts_with("argon2") {
            return Err(AuthError::HashingError(format!(
                "ADMIN_KEY_HASH uses {}, expected argon2",
                parsed.algorithm
            )));
        }
        Ok(())
    }
}

impl Default for Argon2KeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyHasher for Argon2KeyHasher {
    fn hash(&self, key: &str) -> Result<String, AuthError> {
        if key.chars().count() < MIN_KEY_LEN {
            return Err(AuthError::HashingError(format!(
                "admin key must be at least {} characters",
                MIN_KEY_LEN
            )));
        }
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(key.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// A wrong key is `Ok(false)`. A stored hash that cannot be used is an error.
    fn verify(&self, key: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self.argon2.verify_password(key.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}
