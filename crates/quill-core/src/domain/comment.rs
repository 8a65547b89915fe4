use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, positive_id, required_text};
use crate::error::DomainError;

pub type CommentId = i64;

/// Upper bound on a comment author name, in characters.
pub const AUTHOR_MAX_CHARS: usize = 100;

/// Comment entity - a reader response attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Thread order: oldest first, ties broken by the lower id.
    pub fn oldest_first(a: &Comment, b: &Comment) -> Ordering {
        a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
    }
}

/// A validated comment that has not been stored yet.
///
/// Whether `post_id` resolves is checked by the repository at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: PostId, author: &str, content: &str) -> Result<Self, DomainError> {
        Ok(Self {
            post_id: positive_id("post_id", post_id)?,
            author: required_text("author", author, Some(AUTHOR_MAX_CHARS))?,
            content: required_text("content", content, None)?,
            created_at: Utc::now(),
        })
    }

    pub fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            post_id: self.post_id,
            author: self.author,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
