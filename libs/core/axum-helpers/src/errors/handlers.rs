use axum::response::{IntoResponse, Response};

use super::{AppError, ErrorCode, Fault};

/// JSON 404 used as the router fallback.
pub async fn not_found() -> Response {
    AppError::NotFound(Fault::from_code(ErrorCode::NotFound)).into_response()
}
