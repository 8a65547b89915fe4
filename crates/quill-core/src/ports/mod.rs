//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;

pub use auth::{AuthError, KeyHasher};
pub use rate_limit::{RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, CommentRepository, PostFilter, PostRepository};
