use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidatedPost;

/// Default excerpt length, in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

const ELLIPSIS: &str = "...";

/// Post entity - an authored article with a publication state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `owner_id` from already validated fields.
    pub fn new(owner_id: Uuid, fields: ValidatedPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: fields.title,
            content: fields.content,
            published: fields.published,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. Identity, owner and creation time stay.
    pub fn apply(&mut self, fields: ValidatedPost) {
        self.title = fields.title;
        self.content = fields.content;
        self.published = fields.published;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Content shortened to at most `limit` characters, ellipsis included.
    pub fn excerpt(&self, limit: usize) -> String {
        if self.content.chars().count() <= limit {
            return self.content.clone();
        }

        let keep = limit.saturating_sub(ELLIPSIS.len());
        let mut excerpt: String = self.content.chars().take(keep).collect();
        excerpt.push_str(ELLIPSIS);
        excerpt
    }
}
