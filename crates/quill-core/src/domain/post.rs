use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{positive_id, required_text};
use crate::error::DomainError;

pub type PostId = i64;

/// Upper bound on a post title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Post entity - a blog article with a draft/published lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    /// Set once the post is published; drafts are never publicly visible.
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Listing order: newest first, ties broken by the higher id.
    pub fn newest_first(a: &Post, b: &Post) -> Ordering {
        b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
    }

    /// Stamp the publication time.
    ///
    /// Publishing is one-way: an already published post keeps its
    /// original timestamp and this is a no-op.
    pub fn publish(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        if self.published_at.is_some() {
            return Ok(());
        }
        if at < self.created_at {
            return Err(DomainError::Validation(
                "publication time precedes creation time".to_string(),
            ));
        }
        self.published_at = Some(at);
        Ok(())
    }
}

/// A validated post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Validate the submitted fields. Title and content are trimmed.
    pub fn new(title: &str, content: &str, author_id: i64) -> Result<Self, DomainError> {
        Ok(Self {
            title: required_text("title", title, Some(TITLE_MAX_CHARS))?,
            content: required_text("content", content, None)?,
            author_id: positive_id("author_id", author_id)?,
            created_at: Utc::now(),
        })
    }

    /// Attach a generated id. New posts always start unpublished.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            created_at: self.created_at,
            published_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_post_trims_fields() {
        let post = NewPost::new("  Hello ", "World\n", 1).unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.author_id, 1);
    }

    #[test]
    fn test_new_post_rejects_blank_and_long_titles() {
        let err = NewPost::new("   ", "body", 1).unwrap_err();
        assert_eq!(err.to_string(), "title must not be blank");

        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        let err = NewPost::new(&long, "body", 1).unwrap_err();
        assert_eq!(err.to_string(), "title must be at most 200 characters");

        assert!(NewPost::new(&"x".repeat(TITLE_MAX_CHARS), "body", 1).is_ok());
    }

    #[test]
    fn test_new_post_rejects_bad_author() {
        let err = NewPost::new("t", "c", 0).unwrap_err();
        assert_eq!(err.to_string(), "author_id must be a positive integer");
    }

    #[test]
    fn test_publish_is_one_way() {
        let mut post = NewPost::new("t", "c", 1).unwrap().into_post(7);
        assert!(!post.is_published());

        let first = post.created_at + Duration::seconds(5);
        post.publish(first).unwrap();
        assert_eq!(post.published_at, Some(first));

        post.publish(first + Duration::hours(1)).unwrap();
        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn test_newest_first_ordering() {
        let base = NewPost::new("t", "c", 1).unwrap();
        let mut posts: Vec<Post> = (1..=3)
            .map(|id| {
                let mut p = base.clone().into_post(id);
                p.created_at += Duration::seconds(id);
                p
            })
            .collect();
        // Same creation time as post 3, higher id
        let mut tie = base.into_post(4);
        tie.created_at = posts[2].created_at;
        posts.push(tie);

        posts.sort_by(Post::newest_first);
        let ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_publish_before_creation_is_rejected() {
        let mut post = NewPost::new("t", "c", 1).unwrap().into_post(1);
        let early = post.created_at - Duration::seconds(1);
        assert!(matches!(post.publish(early), Err(DomainError::Validation(_))));
        assert!(post.published_at.is_none());
    }
}
