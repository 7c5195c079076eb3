use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pm_core::CoreError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Storage(String),
    Database(db::DbError),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg),
            AppError::Database(err) => match err {
                db::DbError::RequirementNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Requirement not found: {}", id),
                ),
                db::DbError::PrdNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("PRD not found: {}", id),
                ),
                db::DbError::TestCaseNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Test case not found: {}", id),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    format!("{:?}", other),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, mut message) = self.parts();

        // Server-side details are logged, never returned.
        if status.is_server_error() {
            tracing::error!("Database error: {}", message);
            message = "Database error occurred".to_string();
        } else {
            tracing::debug!(status = status.as_u16(), "{}", message);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<db::DbError> for AppError {
    fn from(err: db::DbError) -> Self {
        AppError::Database(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::BadRequest(msg),
            CoreError::BucketNotFound(_) | CoreError::SquadNotFound(_) => {
                AppError::BadRequest(err.to_string())
            }
            CoreError::RequirementNotFound(_) => AppError::NotFound(err.to_string()),
            CoreError::PrdAlreadyExists(_) => AppError::Conflict(err.to_string()),
            CoreError::Storage(msg) => AppError::Storage(msg),
        }
    }
}
