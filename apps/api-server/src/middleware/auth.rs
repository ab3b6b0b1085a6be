//! Identity extractors backed by the token service.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::domain::{Actor, User};
use quill_core::ports::{AuthError, TokenService};
use quill_shared::ErrorResponse;

/// Authenticated user extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.0.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub User);

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor::User(self.0.clone())
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please sign in again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn authenticate(req: &HttpRequest) -> Result<User, AuthenticationError> {
    let token_service = req
        .app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))
        })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    // Parse "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken("Expected Bearer token".to_string()))
    })?;

    token_service
        .validate_token(token)
        .map(User::from)
        .map_err(AuthenticationError)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(Identity))
    }
}

/// Optional identity extractor - anonymous when no token is sent.
///
/// A token that is sent but fails validation is still rejected with 401.
pub struct OptionalIdentity(pub Option<User>);

impl OptionalIdentity {
    pub fn actor(&self) -> Actor {
        Actor::from(self.0.clone())
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = match authenticate(req) {
            Ok(user) => Ok(OptionalIdentity(Some(user))),
            Err(AuthenticationError(AuthError::MissingAuth)) => Ok(OptionalIdentity(None)),
            Err(e) => {
                tracing::debug!(error = %e, path = %req.path(), "Rejected token on public route");
                Err(e)
            }
        };
        ready(identity)
    }
}
