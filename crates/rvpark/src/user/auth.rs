//! Bearer-token middleware for protected routes.
//!
//! The validated account is inserted into request extensions, so handlers
//! downstream can take `Extension<User>` to read the caller.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde_json::json;

use super::domain::User;
use super::repository::{TokenRepository, UserRepository};
use super::service::{AuthError, UserService};

/// Capability the middleware needs from the auth layer: resolve a raw
/// bearer token to an account.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<User, AuthError>;
}

impl<U, T> TokenValidator for UserService<U, T>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    fn validate(&self, token: &str) -> Result<User, AuthError> {
        self.validate_token(token)
    }
}

pub type SharedTokenValidator = Arc<dyn TokenValidator>;

/// Middleware requiring a valid `Authorization: Bearer <token>` header.
pub async fn require_auth(
    Extension(validator): Extension<SharedTokenValidator>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) if !token.is_empty() => token,
        _ => return unauthorized("missing or malformed authorization header"),
    };

    match validator.validate(token) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AuthError::Repository(err)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(_) => unauthorized("invalid token"),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({ "error": message })),
    )
        .into_response()
}
