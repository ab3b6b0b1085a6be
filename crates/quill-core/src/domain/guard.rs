//! Ownership checks. Pure functions, no I/O.

use super::post::Post;
use super::user::User;

/// Whether `user` may edit or delete `post`.
pub fn can_mutate(post: &Post, user: &User) -> bool {
    post.is_owned_by(user.id)
}

/// Whether `user` may approve comments on `post`.
pub fn can_moderate(post: &Post, user: &User) -> bool {
    can_mutate(post, user) || user.is_moderator()
}

/// Whether `viewer` can read `post` at all. Drafts are visible to their owner only.
pub fn can_view(post: &Post, viewer: Option<&User>) -> bool {
    post.published || viewer.is_some_and(|user| can_mutate(post, user))
}
