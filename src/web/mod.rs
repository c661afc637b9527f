//! HTTP surface: axum router over the use cases in [`crate::app`].
//!
//! Pages are rendered HTML; every POST answers 303 See Other with a banner
//! message on the target URL.

pub mod error;
pub mod flash;
pub mod forms;
pub mod pages;

mod marks;
mod reports;
mod students;
mod subjects;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::DbPool;
use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use error::PageError;
use flash::FlashQuery;
use pages::{render, IndexPage};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pool: Arc<DbPool>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Run a use case on the blocking pool; rusqlite calls must not stall the
/// async workers.
pub(crate) async fn with_pool<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&DbPool) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let pool = Arc::clone(&state.pool);
    tokio::task::spawn_blocking(move || f(&pool))
        .await
        .map_err(|e| AppError::Internal(format!("blocking task: {}", e)))?
}

async fn index(Query(q): Query<FlashQuery>) -> Result<Html<String>, PageError> {
    render(&IndexPage {
        flash: q.into_flash(),
    })
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(students::router())
        .merge(subjects::router())
        .merge(marks::router())
        .merge(reports::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &AppConfig, pool: DbPool) -> Result<(), AppError> {
    let app = build_router(AppState::new(pool));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| AppError::Config(format!("bind {}: {}", config.bind_addr, e)))?;
    log::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("server: {}", e)))?;

    log::info!("server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("received Ctrl+C, shutting down"),
        _ = terminate => log::info!("received SIGTERM, shutting down"),
    }
}
