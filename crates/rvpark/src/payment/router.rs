use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::repository::RepositoryError;

use super::domain::{NewPayment, PaymentMethod, PaymentUpdate};
use super::repository::PaymentRepository;
use super::service::{PaymentError, PaymentService};
use super::status::PaymentStatusSource;

/// Router builder exposing payment records and the derived status reads.
pub fn payment_router<R>(service: Arc<PaymentService<R>>) -> Router
where
    R: PaymentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/payments",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/payments/:payment_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/payments/:payment_id/record",
            post(record_handler::<R>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/payments",
            get(tenant_payments_handler::<R>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/payments/latest",
            get(latest_payment_handler::<R>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/payment-status",
            get(payment_status_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DateRangeQuery {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordPaymentRequest {
    pub(crate) method: String,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    axum::Json(payload): axum::Json<NewPayment>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.create_payment(payload) {
        Ok(payment) => (StatusCode::CREATED, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Query(range): Query<DateRangeQuery>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.payments_by_date_range(range.start, range.end) {
        Ok(payments) => (StatusCode::OK, axum::Json(payments)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(payment_id): Path<String>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.get_payment(&payment_id) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(payment_id): Path<String>,
    axum::Json(payload): axum::Json<PaymentUpdate>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.update_payment(&payment_id, payload) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(payment_id): Path<String>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.delete_payment(&payment_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(payment_id): Path<String>,
    axum::Json(payload): axum::Json<RecordPaymentRequest>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    let method = match PaymentMethod::from_str(&payload.method) {
        Ok(method) => method,
        Err(violation) => return error_response(PaymentError::Validation(violation)),
    };

    match service.record_payment(&payment_id, method) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn tenant_payments_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.tenant_payments(&tenant_id) {
        Ok(payments) => (StatusCode::OK, axum::Json(payments)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn latest_payment_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.latest_payment(&tenant_id) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payment_status_handler<R>(
    State(service): State<Arc<PaymentService<R>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    R: PaymentRepository + 'static,
{
    match service.payment_status(&tenant_id) {
        Ok(summary) => (
            StatusCode::OK,
            axum::Json(json!({
                "status": summary.status.label(),
                "past_due_amount": summary.past_due_amount,
            })),
        )
            .into_response(),
        Err(error) => error_response(PaymentError::Repository(error)),
    }
}

fn error_response(error: PaymentError) -> Response {
    let status = match &error {
        PaymentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PaymentError::NotFound { .. } | PaymentError::NoneForTenant { .. } => {
            StatusCode::NOT_FOUND
        }
        PaymentError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PaymentError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PaymentError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
