//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::CreateCommentRequest;

use super::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/comments - new comments await moderation
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .blog
        .add_comment(&identity.actor(), path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        comment_response(&comment),
        "Comment submitted and awaiting approval.",
    )))
}

/// POST /api/comments/{id}/approve
pub async fn approve_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .blog
        .approve_comment(&identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment_response(&comment))))
}
