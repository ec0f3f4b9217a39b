use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_interview_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mock_interview::config::AppConfig;
use mock_interview::error::AppError;
use mock_interview::interview::{
    InterviewApi, InterviewService, JsonFileSnapshotStore, MemorySnapshotStore, SnapshotStore,
};
use mock_interview::telemetry;
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
    if let Some(path) = args.snapshot.take() {
        config.persistence.snapshot_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    match config.persistence.snapshot_path.clone() {
        Some(path) => {
            info!(path = %path.display(), "interview state persisted to disk");
            serve(config, Arc::new(JsonFileSnapshotStore::new(path))).await
        }
        None => {
            info!("interview state kept in memory only");
            serve(config, Arc::new(MemorySnapshotStore::default())).await
        }
    }
}

async fn serve<S>(config: AppConfig, snapshots: Arc<S>) -> Result<(), AppError>
where
    S: SnapshotStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(InterviewService::restore(snapshots)?);
    if let Some(prompt) = service.resume_prompt()? {
        info!(
            candidate = %prompt.candidate_name,
            question = prompt.question_number,
            "unfinished interview restored in paused state"
        );
    }

    let app = with_interview_routes(InterviewApi::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mock interview service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
