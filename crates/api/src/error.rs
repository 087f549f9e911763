//! Error-to-response mapping for handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use cinebook_shared::AppError;

/// Wrapper turning an [`AppError`] into an HTTP response.
///
/// The body carries the error code and the bare message:
/// `{"error": "CONFLICT", "message": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.message()
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = ApiError(AppError::NotFound("Movie not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError(AppError::Conflict("duplicate".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError(AppError::Forbidden(String::new())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
