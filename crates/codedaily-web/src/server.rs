use axum::routing::get;
use axum::Router;
use codedaily_core::Result;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;
use crate::{api, dashboard};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/stats", get(api::stats))
        .route("/history", get(api::history))
        .route("/achievements", get(api::achievements))
        .route("/goal", get(api::goal).post(api::set_goal));

    Router::new()
        .route("/", get(dashboard::index))
        .route("/health", get(api::health))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard on `host:port` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns [`codedaily_core::DailyError::Io`] if the address cannot be bound.
pub async fn run_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let source = state.source.describe();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, %source, "dashboard listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
