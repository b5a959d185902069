use crate::cli::ServeArgs;
use crate::infra::{load_offer_catalog, AppState};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use stage_placement::config::AppConfig;
use stage_placement::error::AppError;
use stage_placement::telemetry;
use stage_placement::workflows::internship::InternshipPlacement;
use std::sync::atomic::Ordering;
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
    if let Some(offers) = args.offers.take() {
        config.workflow.offers_csv = Some(offers);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let offers = load_offer_catalog(config.workflow.offers_csv.as_deref())?;
    let policy = config.workflow.signature_policy.clone();
    let required: Vec<&'static str> = policy
        .required()
        .map(|signatory| signatory.label())
        .collect();
    let placement = Arc::new(InternshipPlacement::in_memory(offers, policy));

    let app = with_placement_routes(placement)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ?required, "internship placement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
