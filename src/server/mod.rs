//! HTTP surface: router, shared state, and the listener loop.

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, TrackerError};
use crate::store::Tracker;

#[derive(Debug, Clone)]
pub struct AppState {
    tracker: Arc<Tracker>,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }

    /// Run a store operation on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Tracker) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = Arc::clone(&self.tracker);
        tokio::task::spawn_blocking(move || op(&tracker))
            .await
            .map_err(|e| TrackerError::Join(e.to_string()))?
    }
}

pub fn router(state: AppState, cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/tasks/clear-completed", delete(handlers::clear_completed))
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/{id}/toggle", patch(handlers::toggle_task))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

/// Bind and serve until SIGINT or SIGTERM.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let tracker = config.tracker();
    let store = tracker.store().describe();
    let app = router(AppState::new(tracker), config.cors);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        address = %addr,
        %store,
        on_corrupt = %config.on_corrupt,
        "task tracker listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("task tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
