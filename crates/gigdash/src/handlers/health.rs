//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Backend name and cache counters (passive, no data source reads)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::handlers::admin::{namespace_stats, NamespaceStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub backend: &'static str,
    pub caches: Vec<NamespaceStats>,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Backend name and cache counters.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        backend: state.backend,
        caches: namespace_stats(&state),
    })
}
