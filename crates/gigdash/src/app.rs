use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{cache_stats, invalidate_namespace, invalidate_subject},
        dashboard::{get_pipeline_automation, get_user_dashboard},
        health::{healthz, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Dashboard snapshots
        .route("/users/{id}/dashboard", get(get_user_dashboard))
        .route(
            "/users/{id}/pipeline-automation",
            get(get_pipeline_automation),
        )
        // Cache administration
        .route("/admin/cache/stats", get(cache_stats))
        .route("/admin/cache/users/{id}", delete(invalidate_subject))
        .route("/admin/cache/{namespace}", delete(invalidate_namespace))
        .layer(cors);

    let request_timeout = state.request_timeout;

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
