use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role that may approve comments on any post.
pub const MODERATOR_ROLE: &str = "moderator";

/// User identity as supplied by the identity provider.
///
/// Accounts live outside Quill; the core only compares ids and checks roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(id: Uuid) -> Self {
        Self { id, roles: Vec::new() }
    }

    pub fn with_roles(id: Uuid, roles: Vec<String>) -> Self {
        Self { id, roles }
    }

    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_moderator(&self) -> bool {
        self.has_role(MODERATOR_ROLE)
    }
}

/// The acting user of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User(User),
}

impl Actor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Actor::User(user)
    }
}

impl From<Option<User>> for Actor {
    fn from(user: Option<User>) -> Self {
        user.map_or(Actor::Anonymous, Actor::User)
    }
}
