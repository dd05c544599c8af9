use crate::cli::ServeArgs;
use crate::infra::{catalog_store, estimate_engine, AppState};
use crate::routes::with_estimate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loandoc_core::config::AppConfig;
use loandoc_core::error::AppError;
use loandoc_core::estimate::LoanEstimateService;
use loandoc_core::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = catalog_store(&config.catalog);
    info!(catalog = %store, parallel = config.engine.parallel, "lender catalog configured");
    let service = Arc::new(LoanEstimateService::new(
        Arc::new(store),
        estimate_engine(&config.engine),
    ));

    let app = with_estimate_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan estimate service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
