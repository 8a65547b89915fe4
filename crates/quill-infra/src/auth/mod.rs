//! Admin key hashing.

mod key;

pub use key::Argon2KeyHasher;
