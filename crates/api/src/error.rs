use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the REST endpoints and the HTTP middleware.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Internal(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Same codes the GraphQL layer puts in `extensions.code`.
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHENTICATED",
            AppError::BadRequest(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Db(_) | AppError::Internal(_) | AppError::Anyhow(_) => "REMOTE_FAILURE",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store and internal details go to the log only.
        let error = match &self {
            AppError::Db(e) => {
                tracing::error!("Database error: {e}");
                "Internal database error".to_string()
            }
            AppError::Internal(_) | AppError::Anyhow(_) => {
                tracing::error!("{self}");
                "Internal error".to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                error,
                code: self.code(),
            }),
        )
            .into_response()
    }
}
