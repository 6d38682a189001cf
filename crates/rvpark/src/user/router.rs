use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::repository::RepositoryError;

use super::domain::{LoginCredentials, NewUser, Role, User};
use super::repository::{TokenRepository, UserRepository};
use super::service::{AuthError, UserService};

/// Public authentication endpoints — mounted outside the auth middleware.
pub fn auth_router<U, T>(service: Arc<UserService<U, T>>) -> Router
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    Router::new()
        .route("/api/v1/login", post(login_handler::<U, T>))
        .with_state(service)
}

/// Account management and session endpoints — mounted behind the auth
/// middleware, so handlers can rely on `Extension<User>`.
pub fn user_router<U, T>(service: Arc<UserService<U, T>>) -> Router
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    Router::new()
        .route("/api/v1/logout", post(logout_handler::<U, T>))
        .route("/api/v1/validate-token", get(validate_token_handler))
        .route(
            "/api/v1/users",
            get(list_handler::<U, T>).post(create_handler::<U, T>),
        )
        .route(
            "/api/v1/users/:user_id",
            get(get_handler::<U, T>)
                .put(update_handler::<U, T>)
                .delete(delete_handler::<U, T>),
        )
        .route(
            "/api/v1/users/:user_id/password",
            post(change_password_handler::<U, T>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserRequest {
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateUserRequest {
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangePasswordRequest {
    pub(crate) old_password: String,
    pub(crate) new_password: String,
}

pub(crate) async fn login_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    axum::Json(creds): axum::Json<LoginCredentials>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.login(creds) {
        Ok((user, token)) => (
            StatusCode::OK,
            axum::Json(json!({ "user": user, "token": token })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn logout_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    Extension(user): Extension<User>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.revoke_all_tokens(&user.id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_token_handler(Extension(user): Extension<User>) -> Response {
    (StatusCode::OK, axum::Json(json!({ "user": user }))).into_response()
}

pub(crate) async fn list_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.list_users() {
        Ok(users) => (StatusCode::OK, axum::Json(users)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    axum::Json(payload): axum::Json<CreateUserRequest>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let new = NewUser {
        email: payload.email,
        username: payload.username,
        role: payload.role,
    };

    match service.create_user(new, &payload.password) {
        Ok(user) => (StatusCode::CREATED, axum::Json(user)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.get_user(&user_id) {
        Ok(user) => (StatusCode::OK, axum::Json(user)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    Path(user_id): Path<String>,
    axum::Json(payload): axum::Json<UpdateUserRequest>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let mut user = match service.get_user(&user_id) {
        Ok(user) => user,
        Err(error) => return error_response(error),
    };

    user.email = payload.email;
    user.username = payload.username;
    user.role = payload.role;

    match service.update_user(user.clone()) {
        Ok(()) => (StatusCode::OK, axum::Json(user)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.delete_user(&user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn change_password_handler<U, T>(
    State(service): State<Arc<UserService<U, T>>>,
    Path(user_id): Path<String>,
    axum::Json(payload): axum::Json<ChangePasswordRequest>,
) -> Response
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.change_password(&user_id, &payload.old_password, &payload.new_password) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AuthError) -> Response {
    let status = match &error {
        AuthError::InvalidCredentials | AuthError::TokenInvalid | AuthError::TokenExpired => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::NotFound { .. } => StatusCode::NOT_FOUND,
        AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AuthError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AuthError::Crypto(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
