//! Identity provider port.

use uuid::Uuid;

use crate::domain::User;

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub roles: Vec<String>,
    pub exp: i64,
}

impl From<TokenClaims> for User {
    fn from(claims: TokenClaims) -> Self {
        User::with_roles(claims.user_id, claims.roles)
    }
}

/// Token service trait. Quill never issues credentials to end users; tokens
/// come from the identity provider, `generate_token` exists for tooling and tests.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user_id: Uuid, roles: Vec<String>) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of generated tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
