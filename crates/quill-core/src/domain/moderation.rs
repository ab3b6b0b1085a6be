//! Comment moderation: approval and visibility.

use super::comment::Comment;
use super::guard;
use super::post::Post;
use super::user::User;
use crate::error::AuthorizationError;

/// Approve `comment` on `post` as `user`.
///
/// Allowed to the post owner and to moderators. Approval is one-way;
/// approving an already approved comment returns it unchanged.
pub fn approve(
    mut comment: Comment,
    post: &Post,
    user: &User,
) -> Result<Comment, AuthorizationError> {
    if comment.post_id != post.id || !guard::can_moderate(post, user) {
        return Err(AuthorizationError::NotModerator);
    }

    comment.approved = true;
    Ok(comment)
}

/// Whether `viewer` may see `comment` on `post`.
pub fn is_visible_to(comment: &Comment, post: &Post, viewer: Option<&User>) -> bool {
    comment.is_approved()
        || viewer.is_some_and(|user| {
            comment.author_id == user.id || guard::can_moderate(post, user)
        })
}

/// Comments on `post` that `viewer` may see, newest first.
///
/// Ties on `created_at` keep the input order.
pub fn visible_comments<I>(
    post: &Post,
    comments: I,
    viewer: Option<&User>,
) -> std::vec::IntoIter<Comment>
where
    I: IntoIterator<Item = Comment>,
{
    let mut visible: Vec<Comment> = comments
        .into_iter()
        .filter(|comment| comment.post_id == post.id && is_visible_to(comment, post, viewer))
        .collect();
    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible.into_iter()
}
