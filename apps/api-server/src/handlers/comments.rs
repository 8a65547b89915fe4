//! Public comment endpoints.

use actix_web::{HttpResponse, web};

use quill_core::domain::NewComment;
use quill_shared::dto::{CommentCreatedResponse, CreateCommentRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /comments/create/
///
/// A comment on a post that does not exist is a 400, never an orphan row.
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let new_comment = NewComment::new(req.post_id, &req.author, &req.content)?;
    let comment = state.comments.create(new_comment).await?;

    tracing::info!(
        comment_id = comment.id,
        post_id = comment.post_id,
        "Comment created"
    );

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        comment_id: comment.id,
    }))
}
