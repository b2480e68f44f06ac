//! Cache administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use gigdash_core::cache::{CacheStats, DashboardNamespace};
use gigdash_core::subject::SubjectId;

use crate::handlers::AppError;
use crate::state::AppState;

/// Cache counters of one namespace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    pub namespace: &'static str,
    pub slug: &'static str,
    #[serde(flatten)]
    pub stats: CacheStats,
}

pub(crate) fn namespace_stats(state: &AppState) -> Vec<NamespaceStats> {
    state
        .cache_stats()
        .into_iter()
        .map(|(namespace, stats)| NamespaceStats {
            namespace: namespace.prefix(),
            slug: namespace.slug(),
            stats,
        })
        .collect()
}

/// Drop the cached snapshots of one user in every namespace
/// (DELETE /api/admin/cache/users/{id}).
pub async fn invalidate_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let subject = SubjectId::parse(&id)?;
    state.invalidate_subject(subject).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Drop every cached snapshot of a namespace
/// (DELETE /api/admin/cache/{namespace}).
pub async fn invalidate_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<StatusCode, AppError> {
    let namespace = DashboardNamespace::parse(&namespace)?;
    state.invalidate_namespace(namespace).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Cache counters of every namespace (GET /api/admin/cache/stats).
pub async fn cache_stats(State(state): State<AppState>) -> Json<Vec<NamespaceStats>> {
    Json(namespace_stats(&state))
}
