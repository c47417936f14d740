use axum::extract::State;
use axum::Json;
use rapport_core::dto::RunReportDto;
use rapport_core::time::{local_offset, now_utc};
use rapport_engine::{BatchBudget, NurtureGenerator, PostCallGenerator, RunReport};
use rapport_store::Store;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/jobs/nurture — run one nurture batch against the store.
pub async fn run_nurture(State(app): State<AppState>) -> Result<Json<RunReportDto>, AppError> {
    let report = run_job(&app, "nurture", NurtureGenerator::run).await?;
    Ok(Json(report.to_dto("nurture")))
}

/// POST /api/jobs/post-call — sweep recently ended calls once.
pub async fn run_post_call(State(app): State<AppState>) -> Result<Json<RunReportDto>, AppError> {
    let report = run_job(&app, "post-call", PostCallGenerator::run).await?;
    Ok(Json(report.to_dto("post-call")))
}

/// GET /api/health — liveness, unauthenticated.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn run_job<F>(app: &AppState, job: &'static str, generator: F) -> Result<RunReport, AppError>
where
    F: FnOnce(
            &Store,
            &rapport_config::EngineConfig,
            i64,
            chrono::FixedOffset,
            BatchBudget,
        ) -> rapport_engine::Result<RunReport>
        + Send
        + 'static,
{
    let db_path = app.db_path.clone();
    let config = app.config.clone();

    let report = tokio::task::spawn_blocking(move || {
        let store = Store::open(&db_path)?;
        store.migrate()?;
        let budget = BatchBudget::from_secs(config.engine.batch_budget_secs);
        let report = generator(&store, &config.engine, now_utc(), local_offset(), budget)?;
        Ok::<_, anyhow::Error>(report)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    info!(job, "{}", report.summary(job));
    Ok(report)
}
