//! Admin endpoints: publication and deletion.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::{CommentId, PostId};
use quill_core::error::RepoError;
use quill_core::ports::PostFilter;
use quill_shared::dto::{PostListQuery, PostResponse};

use super::posts::post_response;
use crate::middleware::admin::AdminGuard;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Report a missing row as a missing `entity` with the requested id.
fn missing(entity: &'static str, id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound => DomainError::NotFound { entity, id }.into(),
        other => other.into(),
    }
}

/// GET /admin/posts/?published=<bool>&search=<text>
pub async fn list_posts(
    _admin: AdminGuard,
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter {
        published: query.published,
        search: query.search.filter(|term| !term.is_empty()),
    };

    let posts = state.posts.list(&filter).await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /admin/posts/{id}/publish/
pub async fn publish_post(
    _admin: AdminGuard,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .publish(id, chrono::Utc::now())
        .await
        .map_err(missing("post", id))?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// DELETE /admin/posts/{id}/
///
/// Comments of the post are deleted with it.
pub async fn delete_post(
    _admin: AdminGuard,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state.posts.delete(id).await.map_err(missing("post", id))?;
    tracing::info!(post_id = id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /admin/comments/{id}/
pub async fn delete_comment(
    _admin: AdminGuard,
    state: web::Data<AppState>,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .comments
        .delete(id)
        .await
        .map_err(missing("comment", id))?;
    tracing::info!(comment_id = id, "Comment deleted");

    Ok(HttpResponse::NoContent().finish())
}
