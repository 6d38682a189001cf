use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::repository::RepositoryError;
use crate::space::repository::SpaceRepository;

use super::domain::{NewTenant, TenantUpdate};
use super::repository::TenantRepository;
use super::service::{TenantError, TenantService};

/// Router builder exposing the tenant lifecycle endpoints.
pub fn tenant_router<T, S>(service: Arc<TenantService<T, S>>) -> Router
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/tenants",
            get(list_handler::<T, S>).post(create_handler::<T, S>),
        )
        .route(
            "/api/v1/tenants/:tenant_id",
            get(get_handler::<T, S>)
                .put(update_handler::<T, S>)
                .delete(delete_handler::<T, S>),
        )
        .route(
            "/api/v1/spaces/:space_id/tenant",
            get(by_space_handler::<T, S>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.list_tenants() {
        Ok(tenants) => (StatusCode::OK, axum::Json(tenants)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
    axum::Json(payload): axum::Json<NewTenant>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.create_tenant(payload) {
        Ok(tenant) => (StatusCode::CREATED, axum::Json(tenant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.get_tenant(&tenant_id) {
        Ok(tenant) => (StatusCode::OK, axum::Json(tenant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
    Path(tenant_id): Path<String>,
    axum::Json(payload): axum::Json<TenantUpdate>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.update_tenant(&tenant_id, payload) {
        Ok(tenant) => (StatusCode::OK, axum::Json(tenant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.delete_tenant(&tenant_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn by_space_handler<T, S>(
    State(service): State<Arc<TenantService<T, S>>>,
    Path(space_id): Path<String>,
) -> Response
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    match service.get_tenant_by_space(&space_id) {
        Ok(tenant) => (StatusCode::OK, axum::Json(tenant)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TenantError) -> Response {
    let status = match &error {
        TenantError::Validation(_) | TenantError::InvalidReference { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TenantError::NotFound { .. } | TenantError::NotFoundBySpace { .. } => {
            StatusCode::NOT_FOUND
        }
        TenantError::SpaceUnavailable { .. } => StatusCode::CONFLICT,
        TenantError::BindingFailed { .. }
        | TenantError::UnbindFailed { .. }
        | TenantError::RebindFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        TenantError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TenantError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
