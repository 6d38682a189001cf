use crate::cli::ServeArgs;
use crate::infra::{
    seed_spaces, AppState, InMemoryPaymentRepository, InMemorySpaceRepository,
    InMemoryTenantRepository, InMemoryTokenRepository, InMemoryUserRepository,
};
use crate::routes::api_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Duration;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use rvpark::config::AppConfig;
use rvpark::error::AppError;
use rvpark::payment::PaymentService;
use rvpark::space::SpaceService;
use rvpark::telemetry;
use rvpark::tenant::TenantService;
use rvpark::user::{ensure_admin, ensure_staff, SharedTokenValidator, UserService};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let space_repo = Arc::new(InMemorySpaceRepository::default());
    seed_spaces(&space_repo)?;

    let payment_service = Arc::new(PaymentService::new(Arc::new(
        InMemoryPaymentRepository::default(),
    )));
    let space_service = Arc::new(SpaceService::new(space_repo, payment_service.clone()));
    let tenant_service = Arc::new(TenantService::new(
        Arc::new(InMemoryTenantRepository::default()),
        space_service.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(InMemoryTokenRepository::default()),
        Duration::hours(config.auth.token_ttl_hours),
    ));

    ensure_admin(&user_service, &config.auth)?;
    ensure_staff(&user_service, &config.auth)?;

    let validator: SharedTokenValidator = user_service.clone();
    let app = api_router(
        space_service,
        tenant_service,
        payment_service,
        user_service,
        validator,
    )
    .layer(Extension(app_state))
    .layer(CorsLayer::permissive())
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rv park backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
