use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gigdash_core::snapshot::{dashboard_error_to_status_code, DashboardError};
use gigdash_core::sources::{data_source_error_to_status_code, DataSourceError};
use gigdash_core::subject::ValidationError;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(error) = self.0.downcast_ref::<DashboardError>() {
            match error {
                DashboardError::Validation(ValidationError::UnknownNamespace(_)) => 404,
                error => dashboard_error_to_status_code(error),
            }
        } else if let Some(error) = self.0.downcast_ref::<ValidationError>() {
            match error {
                ValidationError::UnknownNamespace(_) => 404,
                _ => 400,
            }
        } else if let Some(error) = self.0.downcast_ref::<DataSourceError>() {
            data_source_error_to_status_code(error)
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(status = status_code.as_u16(), error = %self.0, "Request failed");
        }

        (
            status_code,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
