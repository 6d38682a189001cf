use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use super::common::{new_payment, service};
use crate::payment::router::{self, RecordPaymentRequest};

#[tokio::test]
async fn record_handler_rejects_unknown_methods() {
    let (_, payments) = service();
    let created = payments
        .create_payment(new_payment("tenant-1", 10))
        .expect("payment persists");

    let response = router::record_handler(
        State(Arc::new(payments)),
        Path(created.id),
        axum::Json(RecordPaymentRequest {
            method: "BARTER".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn record_handler_settles_payments() {
    let (_, payments) = service();
    let created = payments
        .create_payment(new_payment("tenant-1", 10))
        .expect("payment persists");
    let payments = Arc::new(payments);

    let response = router::record_handler(
        State(payments.clone()),
        Path(created.id.clone()),
        axum::Json(RecordPaymentRequest {
            method: "cash".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = payments.get_payment(&created.id).expect("fetch succeeds");
    assert!(stored.paid_date.is_some());
}

#[tokio::test]
async fn record_handler_returns_not_found_for_unknown_payments() {
    let (_, payments) = service();

    let response = router::record_handler(
        State(Arc::new(payments)),
        Path("ghost".to_string()),
        axum::Json(RecordPaymentRequest {
            method: "CASH".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
