//! Domain entities - the core business objects.

mod comment;
mod post;

pub use comment::{AUTHOR_MAX_CHARS, Comment, CommentId, NewComment};
pub use post::{NewPost, Post, PostId, TITLE_MAX_CHARS};

use crate::error::DomainError;

/// Trim a required text field and check it against an optional length bound.
fn required_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            return Err(DomainError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(trimmed.to_string())
}

fn positive_id(field: &str, value: i64) -> Result<i64, DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(value)
}
