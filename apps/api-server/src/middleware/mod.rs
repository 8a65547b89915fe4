//! Middleware and extractors.

pub mod admin;
pub mod error;
pub mod rate_limit;
