//! REST API over the tariff engine.
//!
//! Provides three endpoints:
//! - `GET /state`: loaded scenario and its computed report
//! - `POST /calculate`: compute a report for a posted bill
//! - `GET /trend`: daily trend rows with optional day range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::report::SavingsReport;

pub use types::CalculateRequest;

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; no locks needed since the
/// engine is pure and all data is read-only.
#[derive(Debug)]
pub struct AppState {
    /// Scenario used as the base for every request.
    pub scenario: ScenarioConfig,
    /// Report for the scenario's own bill, if it has one.
    pub report: Option<SavingsReport>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/calculate", post(handlers::post_calculate))
        .route("/trend", get(handlers::get_trend))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
