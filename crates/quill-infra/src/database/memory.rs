//! In-memory store - used when no database is configured.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostFilter, PostRepository};

#[derive(Default)]
struct Tables {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    last_post_id: PostId,
    last_comment_id: CommentId,
}

/// Posts and comments behind a single async RwLock.
///
/// Both repositories handed out by [`InMemoryStore::posts`] and
/// [`InMemoryStore::comments`] share the same tables, so a comment insert
/// sees post deletions and cascades stay atomic.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;

        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.post_id != id);
        tracing::debug!(
            post_id = id,
            comments = before - tables.comments.len(),
            "Deleted post and its comments"
        );
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let post = post.into_post(tables.last_post_id);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.is_published())
            .cloned()
            .collect();
        posts.sort_by(Post::newest_first);
        Ok(posts)
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(Post::newest_first);
        Ok(posts)
    }

    async fn publish(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.publish(at)
            .map_err(|e| RepoError::Constraint(e.to_string()))?;
        Ok(post.clone())
    }
}

#[async_trait]
impl BaseRepository<Comment, CommentId> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }

        tables.last_comment_id += 1;
        let comment = comment.into_comment(tables.last_comment_id);
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(Comment::oldest_first);
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_post(title: &str) -> NewPost {
        NewPost::new(title, "content", 1).unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_generated_in_order() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        assert_eq!(posts.create(new_post("a")).await.unwrap().id, 1);
        assert_eq!(posts.create(new_post("b")).await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_list_published_skips_drafts_newest_first() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let base = Utc::now();
        let mut ids = Vec::new();
        for (i, title) in ["t1", "t2", "t3"].into_iter().enumerate() {
            let mut post = new_post(title);
            post.created_at = base + Duration::seconds(i as i64);
            ids.push(posts.create(post).await.unwrap().id);
        }
        posts.create(new_post("draft")).await.unwrap();

        for id in &ids {
            posts.publish(*id, Utc::now() + Duration::minutes(1)).await.unwrap();
        }

        let titles: Vec<String> = posts
            .list_published()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_publish_unknown_post() {
        let store = InMemoryStore::new();
        let result = store.posts().publish(42, Utc::now()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let store = InMemoryStore::new();
        let comments = store.comments();

        let result = comments
            .create(NewComment::new(999, "bob", "hi").unwrap())
            .await;
        match result {
            Err(RepoError::Constraint(msg)) => assert_eq!(msg, "post 999 does not exist"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(comments.find_by_post_id(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let store = InMemoryStore::new();
        let (posts, comments) = (store.posts(), store.comments());

        let keep = posts.create(new_post("keep")).await.unwrap();
        let doomed = posts.create(new_post("doomed")).await.unwrap();
        let kept = comments
            .create(NewComment::new(keep.id, "ann", "stays").unwrap())
            .await
            .unwrap();
        let gone = comments
            .create(NewComment::new(doomed.id, "bob", "goes").unwrap())
            .await
            .unwrap();

        posts.delete(doomed.id).await.unwrap();

        assert!(posts.find_by_id(doomed.id).await.unwrap().is_none());
        assert!(comments.find_by_id(gone.id).await.unwrap().is_none());
        assert_eq!(comments.find_by_id(kept.id).await.unwrap(), Some(kept));
        assert!(matches!(
            posts.delete(doomed.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_comments_oldest_first() {
        let store = InMemoryStore::new();
        let post = store.posts().create(new_post("p")).await.unwrap();
        let comments = store.comments();

        let base = Utc::now();
        for (offset, author) in [(5, "late"), (1, "early")] {
            let mut c = NewComment::new(post.id, author, "text").unwrap();
            c.created_at = base + Duration::seconds(offset);
            comments.create(c).await.unwrap();
        }

        let authors: Vec<String> = comments
            .find_by_post_id(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.author)
            .collect();
        assert_eq!(authors, vec!["early", "late"]);
    }
}
