use crate::cli::ServeArgs;
use crate::infra::{AppState, MatchState};
use crate::routes::{match_routes, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use intern_match::config::{AppConfig, RankingServiceConfig};
use intern_match::error::AppError;
use intern_match::matching::HttpRankingService;
use intern_match::telemetry;
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
    if let Some(url) = args.ranking_url.take() {
        let timeout = config.ranking_service.timeout;
        config.ranking_service = RankingServiceConfig::new(url)?.with_timeout(timeout);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = HttpRankingService::new(config.ranking_service.clone())?;
    let match_state = MatchState::new(Arc::new(service));

    let app = with_operational_routes(match_routes(match_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ranking_api = %config.ranking_service.base_url,
        "internship matching api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
