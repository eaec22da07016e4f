use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use onthefly_core::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
///
/// This is the system boundary: every fetch/stream/decode failure is
/// converted into a structured JSON error here, nothing escapes
/// unconverted and nothing is fatal to the process.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::MissingParameter(_) | AppError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
