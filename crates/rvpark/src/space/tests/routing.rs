use super::common::{overdue_source, service_with, MemorySpaceRepository};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::space::domain::Space;
use crate::space::repository::SpaceRepository;
use crate::space::router;
use crate::space::service::SpaceService;

async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn get_handler_serves_derived_display_status() {
    let repo = Arc::new(MemorySpaceRepository::default());
    repo.insert(Space::vacant("A1", "Mane Street"))
        .expect("seed space");
    let service = Arc::new(SpaceService::new(repo, overdue_source(42.0)));
    service.move_in("A1", "tenant-1").expect("move-in");

    let response = router::get_handler::<MemorySpaceRepository>(
        State(service),
        Path("A1".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("display_status").and_then(Value::as_str),
        Some("Occupied (Overdue)")
    );
    assert_eq!(
        payload.get("past_due_amount").and_then(Value::as_f64),
        Some(42.0)
    );
}

#[tokio::test]
async fn get_handler_returns_not_found_for_unknown_ids() {
    let (_, service) = service_with(vec![Space::vacant("A1", "Mane Street")]);

    let response = router::get_handler::<MemorySpaceRepository>(
        State(Arc::new(service)),
        Path("Z9".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reserve_handler_maps_state_conflicts_to_409() {
    let (_, service) = service_with(vec![Space::vacant("A1", "Mane Street")]);
    let service = Arc::new(service);
    service.move_in("A1", "tenant-1").expect("move-in");

    let response = router::reserve_handler::<MemorySpaceRepository>(
        State(service),
        Path("A1".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn move_in_route_accepts_payloads() {
    let (repo, service) = service_with(vec![Space::vacant("A1", "Mane Street")]);
    let app = router::space_router(Arc::new(service));

    let response = app
        .oneshot(
            axum::http::Request::post("/api/v1/spaces/A1/move-in")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::json!({ "tenant_id": "tenant-1" }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = repo.get("A1").expect("get succeeds").expect("present");
    assert_eq!(stored.tenant_id.as_deref(), Some("tenant-1"));
}
