//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Posts, comments, their validation rules and the ports the storage
//! and HTTP layers are written against. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
