use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRosterRepository};
use crate::routes::with_reconciliation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use torre_controle::config::AppConfig;
use torre_controle::error::AppError;
use torre_controle::reconciliation::ReconciliationService;
use torre_controle::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(cascade) = args.cascade.take() {
        config.reconciliation.cascade = cascade;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let roster = Arc::new(InMemoryRosterRepository::default());
    let service = Arc::new(ReconciliationService::new(
        roster,
        config.reconciliation.cascade,
    ));

    let app = with_reconciliation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cascade = config.reconciliation.cascade.label(),
        "driver reconciliation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
