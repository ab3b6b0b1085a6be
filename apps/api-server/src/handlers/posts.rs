//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PostChanges, PostInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CreatePostRequest, ListPostsQuery, PostDetailResponse, PostResponse, UpdatePostRequest,
};

use super::{comment_response, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?search=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.blog.list_posts(query.search.as_deref()).await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/posts/mine?search= - the caller's posts, drafts included
pub async fn list_own_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .blog
        .list_own_posts(&identity.actor(), query.search.as_deref())
        .await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/posts/{id}
pub async fn view_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .blog
        .view_post(&identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: post_response(&view.post),
        comments: view.comments.iter().map(comment_response).collect(),
    })))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = PostInput {
        title: req.title,
        content: req.content,
        published: req.published,
    };

    let post = state.blog.create_post(&identity.actor(), input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post_response(&post),
        "Post was successfully created.",
    )))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        published: req.published,
    };

    let post = state
        .blog
        .update_post(&identity.actor(), path.into_inner(), changes)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(&post),
        "Post was successfully updated.",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .blog
        .delete_post(&identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post was successfully deleted.")))
}
