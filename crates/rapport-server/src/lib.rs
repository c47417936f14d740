pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Build the axum Router with all routes and middleware. Used by
/// `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let jobs = Router::new()
        .route("/api/jobs/nurture", post(routes::jobs::run_nurture))
        .route("/api/jobs/post-call", post(routes::jobs::run_post_call))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_secret,
        ));

    Router::new()
        .route("/api/health", get(routes::jobs::health))
        .merge(jobs)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the trigger server and serve until the process is interrupted.
pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let bind = app_state.config.server.bind.clone();
    if app_state.trigger_secret.is_none() {
        anyhow::bail!(
            "no trigger secret configured; set {} or [server].trigger_secret",
            rapport_config::SECRET_ENV_VAR
        );
    }

    let router = build_router(app_state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(%bind, "trigger server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
