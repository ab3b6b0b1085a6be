//! Domain entities - the core business objects and the rules over them.

mod comment;
mod post;
mod user;

pub mod guard;
pub mod moderation;
pub mod query;
pub mod validation;

pub use comment::{Comment, ModerationState};
pub use post::{DEFAULT_EXCERPT_LENGTH, Post};
pub use query::PostQuery;
pub use user::{Actor, MODERATOR_ROLE, User};
pub use validation::{
    CommentInput, PostChanges, PostInput, Rule, ValidatedComment, ValidatedPost, ValidationError,
    ValidationErrors, validate_comment, validate_post,
};
