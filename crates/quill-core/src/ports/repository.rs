use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId};
use crate::error::RepoError;

/// Operations every stored entity supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` if absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
///
/// Deleting a post through [`BaseRepository::delete`] also deletes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Store a new, unpublished post and return it with its generated id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Published posts, newest first.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError>;

    /// All posts matching `filter`, drafts included, newest first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Stamp `published_at` if unset. Fails with `RepoError::NotFound` for an unknown id.
    async fn publish(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, CommentId> {
    /// Store a comment. Fails with `RepoError::Constraint` when the post does not exist.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments of a post, oldest first.
    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError>;
}

/// Admin listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// `Some(true)` keeps published posts, `Some(false)` keeps drafts.
    pub published: Option<bool>,
    /// Keep posts whose title or content contains this text.
    pub search: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(published) = self.published {
            if post.is_published() != published {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(term) => post.title.contains(term) || post.content.contains(term),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;

    fn post(id: PostId, title: &str, published: bool) -> Post {
        let mut post = NewPost::new(title, "some content", 1).unwrap().into_post(id);
        if published {
            post.publish(post.created_at).unwrap();
        }
        post
    }

    #[test]
    fn test_filter_on_publication_state() {
        let draft = post(1, "draft", false);
        let live = post(2, "live", true);

        let filter = PostFilter { published: Some(true), search: None };
        assert!(!filter.matches(&draft));
        assert!(filter.matches(&live));

        let filter = PostFilter { published: Some(false), search: None };
        assert!(filter.matches(&draft));
        assert!(!filter.matches(&live));

        assert!(PostFilter::default().matches(&draft));
    }

    #[test]
    fn test_filter_search_title_and_content() {
        let p = post(1, "Rust ownership", false);
        let by_title = PostFilter { published: None, search: Some("owner".into()) };
        let by_content = PostFilter { published: None, search: Some("content".into()) };
        let miss = PostFilter { published: None, search: Some("borrow".into()) };
        assert!(by_title.matches(&p));
        assert!(by_content.matches(&p));
        assert!(!miss.matches(&p));
    }
}
