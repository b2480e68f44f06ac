use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use gigdash_core::snapshot::{PipelineAutomation, UserDashboard};

use crate::dashboard::DashboardOptions;
use crate::handlers::AppError;
use crate::state::AppState;

/// Query string of the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(
        default,
        rename = "bypassCache",
        deserialize_with = "gigdash_core::serde::deserialize_flag"
    )]
    pub bypass_cache: bool,
}

impl From<DashboardQuery> for DashboardOptions {
    fn from(query: DashboardQuery) -> Self {
        Self {
            bypass_cache: query.bypass_cache,
        }
    }
}

/// Get the marketplace dashboard of a user (GET /api/users/{id}/dashboard).
pub async fn get_user_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Arc<UserDashboard>>, AppError> {
    let bypass_cache = query.bypass_cache;
    let dashboard = state.user_dashboards.resolve(&id, query.into()).await?;

    tracing::info!(
        subject_id = %dashboard.subject_id,
        bypass_cache,
        generated_at = %dashboard.generated_at,
        "Served user dashboard"
    );

    Ok(Json(dashboard))
}

/// Get the pipeline automation snapshot of a user
/// (GET /api/users/{id}/pipeline-automation).
pub async fn get_pipeline_automation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Arc<PipelineAutomation>>, AppError> {
    let bypass_cache = query.bypass_cache;
    let snapshot = state.pipeline_automation.resolve(&id, query.into()).await?;

    tracing::info!(
        subject_id = %snapshot.subject_id,
        bypass_cache,
        generated_at = %snapshot.generated_at,
        "Served pipeline automation snapshot"
    );

    Ok(Json(snapshot))
}
