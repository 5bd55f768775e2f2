use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use super::AppError;

/// Router fallback for unknown paths.
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for {}", uri.path())).into_response()
}

/// Handler for 405 Method Not Allowed errors.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
