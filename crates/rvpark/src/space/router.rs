use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::repository::RepositoryError;

use super::domain::{PaymentCadence, Space, SpaceStatus};
use super::repository::SpaceRepository;
use super::service::{SpaceError, SpaceService};

/// Router builder exposing the space lifecycle endpoints.
pub fn space_router<R>(service: Arc<SpaceService<R>>) -> Router
where
    R: SpaceRepository + 'static,
{
    Router::new()
        .route("/api/v1/spaces", get(list_handler::<R>))
        .route("/api/v1/spaces/vacant", get(vacant_handler::<R>))
        .route(
            "/api/v1/spaces/:space_id",
            get(get_handler::<R>).put(update_handler::<R>),
        )
        .route("/api/v1/spaces/:space_id/reserve", post(reserve_handler::<R>))
        .route(
            "/api/v1/spaces/:space_id/unreserve",
            post(unreserve_handler::<R>),
        )
        .route("/api/v1/spaces/:space_id/move-in", post(move_in_handler::<R>))
        .route(
            "/api/v1/spaces/:space_id/move-out",
            post(move_out_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveInRequest {
    pub(crate) tenant_id: String,
}

/// Administrative edit payload. The section is carried by the stored record
/// and cannot be changed through this endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateSpaceRequest {
    pub(crate) status: SpaceStatus,
    #[serde(default)]
    pub(crate) tenant_id: Option<String>,
    pub(crate) reserved: bool,
    #[serde(default)]
    pub(crate) payment_cadence: Option<PaymentCadence>,
    #[serde(default)]
    pub(crate) next_payment: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) tenant_notified: bool,
    #[serde(default)]
    pub(crate) past_due_amount: f64,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.list_spaces() {
        Ok(grouped) => (StatusCode::OK, axum::Json(grouped)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vacant_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.vacant_spaces() {
        Ok(spaces) => (StatusCode::OK, axum::Json(spaces)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.get_space(&space_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
    axum::Json(payload): axum::Json<UpdateSpaceRequest>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    let current = match service.space(&space_id) {
        Ok(space) => space,
        Err(error) => return error_response(error),
    };

    let update = Space {
        id: space_id.clone(),
        section: current.section,
        status: payload.status,
        tenant_id: payload.tenant_id,
        reserved: payload.reserved,
        payment_cadence: payload.payment_cadence,
        next_payment: payload.next_payment,
        tenant_notified: payload.tenant_notified,
        past_due_amount: payload.past_due_amount,
    };

    if let Err(error) = service.update_space(update) {
        return error_response(error);
    }

    match service.get_space(&space_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reserve_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.reserve(&space_id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn unreserve_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.unreserve(&space_id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn move_in_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
    axum::Json(payload): axum::Json<MoveInRequest>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    if let Err(error) = service.move_in(&space_id, &payload.tenant_id) {
        return error_response(error);
    }

    match service.get_space(&space_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn move_out_handler<R>(
    State(service): State<Arc<SpaceService<R>>>,
    Path(space_id): Path<String>,
) -> Response
where
    R: SpaceRepository + 'static,
{
    match service.move_out(&space_id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SpaceError) -> Response {
    let status = match &error {
        SpaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        SpaceError::StateConflict { .. } => StatusCode::CONFLICT,
        SpaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SpaceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SpaceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
