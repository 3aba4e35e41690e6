//! HTTP surface
//!
//! A thin axum router over [`TodayService`]: one data route plus liveness and
//! config introspection.

pub mod error;
mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::data::TodayService;

pub use error::{ApiError, ApiErrorBody};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub today: Arc<TodayService>,
}

impl AppState {
    pub fn new(today: Arc<TodayService>) -> Self {
        Self { today }
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/neos/today", get(routes::neos_today))
        .route("/api/health", get(routes::health))
        .route("/api/config", get(routes::config))
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        // No signal handler: run until killed
        Err(_) => std::future::pending::<()>().await,
    }
}
