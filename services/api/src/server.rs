use crate::cli::ServeArgs;
use crate::infra::{AppState, Probes};
use crate::routes::with_form_test_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use formcheck::config::AppConfig;
use formcheck::error::AppError;
use formcheck::telemetry;
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

    let probes = Probes::from_config(&config)?;
    let app = with_form_test_routes(probes.form_test_service())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, site = config.site.base_url(), "form diagnostics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
