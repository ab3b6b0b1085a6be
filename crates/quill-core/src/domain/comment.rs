use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidatedComment;

/// Comment entity - a reader's reaction to a post, gated by moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Moderation state of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationState {
    Pending,
    Approved,
}

impl Comment {
    /// Create a new, pending comment.
    pub fn new(post_id: Uuid, author_id: Uuid, fields: ValidatedComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content: fields.content,
            approved: fields.approved,
            created_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn is_pending_approval(&self) -> bool {
        !self.approved
    }

    pub fn state(&self) -> ModerationState {
        if self.approved {
            ModerationState::Approved
        } else {
            ModerationState::Pending
        }
    }
}
