use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;

use rvpark::payment::{payment_router, PaymentRepository, PaymentService};
use rvpark::space::{space_router, SpaceRepository, SpaceService};
use rvpark::tenant::{tenant_router, TenantRepository, TenantService};
use rvpark::user::{
    auth_router, require_auth, user_router, SharedTokenValidator, TokenRepository, UserRepository,
    UserService,
};

use crate::infra::AppState;

/// Compose the public and token-protected routers with the service
/// endpoints.
pub(crate) fn api_router<S, T, P, U, K>(
    spaces: Arc<SpaceService<S>>,
    tenants: Arc<TenantService<T, S>>,
    payments: Arc<PaymentService<P>>,
    users: Arc<UserService<U, K>>,
    validator: SharedTokenValidator,
) -> Router
where
    S: SpaceRepository + 'static,
    T: TenantRepository + 'static,
    P: PaymentRepository + 'static,
    U: UserRepository + 'static,
    K: TokenRepository + 'static,
{
    let protected = Router::new()
        .merge(space_router(spaces))
        .merge(tenant_router(tenants))
        .merge(payment_router(payments))
        .merge(user_router(users.clone()))
        .layer(middleware::from_fn(require_auth));

    Router::new()
        .merge(auth_router(users))
        .merge(protected)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(validator))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration;
    use tower::util::ServiceExt;

    use rvpark::user::{LoginCredentials, NewUser, Role};

    use crate::infra::{
        seed_spaces, InMemoryPaymentRepository, InMemorySpaceRepository, InMemoryTenantRepository,
        InMemoryTokenRepository, InMemoryUserRepository,
    };

    fn test_app() -> (Router, String) {
        let space_repo = Arc::new(InMemorySpaceRepository::default());
        seed_spaces(&space_repo).expect("seed spaces");

        let payments = Arc::new(PaymentService::new(Arc::new(
            InMemoryPaymentRepository::default(),
        )));
        let spaces = Arc::new(SpaceService::new(space_repo, payments.clone()));
        let tenants = Arc::new(TenantService::new(
            Arc::new(InMemoryTenantRepository::default()),
            spaces.clone(),
        ));
        let users = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(InMemoryTokenRepository::default()),
            Duration::hours(24),
        ));

        users
            .create_user(
                NewUser {
                    email: "desk@rvpark.com".to_string(),
                    username: "frontdesk".to_string(),
                    role: Role::Staff,
                },
                "hunter2",
            )
            .expect("seed account");
        let (_, token) = users
            .login(LoginCredentials {
                email: "desk@rvpark.com".to_string(),
                password: "hunter2".to_string(),
            })
            .expect("seed login");

        let validator: SharedTokenValidator = users.clone();
        (
            api_router(spaces, tenants, payments, users, validator),
            token,
        )
    }

    #[tokio::test]
    async fn healthcheck_is_public() {
        let (app, _) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn space_listing_requires_a_bearer_token() {
        let (app, token) = test_app();

        let denied = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/spaces")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/spaces")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn tenant_create_binds_a_seeded_space() {
        let (app, token) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/tenants")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "name": "Billie Roam", "space_id": "A1" }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::CREATED);

        let view = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/spaces/A1")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(view.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_rejects_unknown_accounts() {
        let (app, _) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "email": "nobody@rvpark.com", "password": "nope" }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
