//! Public post endpoints.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::{Comment, NewPost, Post, PostId};
use quill_shared::dto::{
    CommentResponse, CreatePostRequest, PostCreatedResponse, PostDetailResponse, PostResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Public projection of a post.
pub(crate) fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        author_id: post.author_id,
        created_at: post.created_at.to_rfc3339(),
        published_at: post.published_at.map(|at| at.to_rfc3339()),
    }
}

fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        author: comment.author.clone(),
        content: comment.content.clone(),
        created_at: comment.created_at.to_rfc3339(),
    }
}

/// GET /posts/
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}/
///
/// Drafts are reported as missing.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .filter(Post::is_published)
        .ok_or(DomainError::NotFound { entity: "post", id })?;

    let comments = state.comments.find_by_post_id(id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(&post),
        comments: comments.iter().map(comment_response).collect(),
    }))
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let new_post = NewPost::new(&req.title, &req.content, req.author_id)?;
    let post = state.posts.create(new_post).await?;

    tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");

    Ok(HttpResponse::Created().json(PostCreatedResponse { post_id: post.id }))
}
