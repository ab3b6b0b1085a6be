//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;

use actix_web::web;

use quill_core::domain::{Comment, DEFAULT_EXCERPT_LENGTH, Post};
use quill_shared::dto::{CommentResponse, PostResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    // before "/{id}" so "mine" is not taken for an id
                    .route("/mine", web::get().to(posts::list_own_posts))
                    .route("/{id}", web::get().to(posts::view_post))
                    .route("/{id}", web::patch().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/comments", web::post().to(comments::add_comment)),
            )
            .route(
                "/comments/{id}/approve",
                web::post().to(comments::approve_comment),
            ),
    );
}

pub(crate) fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        owner_id: post.owner_id.to_string(),
        title: post.title.clone(),
        content: post.content.clone(),
        excerpt: post.excerpt(DEFAULT_EXCERPT_LENGTH),
        published: post.published,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

pub(crate) fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        post_id: comment.post_id.to_string(),
        author_id: comment.author_id.to_string(),
        content: comment.content.clone(),
        approved: comment.approved,
        created_at: comment.created_at.to_rfc3339(),
    }
}
