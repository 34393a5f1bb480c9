/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so a bare `?` on a `GqlError` yields a message without a code. Resolvers call
/// `.coded()` instead, which goes through `ErrorExtensions` and attaches
/// `extensions.code` so clients can tell a missing club from a failed store call:
///   - `INVALID_INPUT`: validation failures, malformed IDs
///   - `NOT_FOUND`: the referenced record does not exist
///   - `UNAUTHENTICATED` / `FORBIDDEN`: session missing, or not the creator
///   - `REMOTE_FAILURE`: the store rejected the operation (detail logged, not returned)
use async_graphql::ErrorExtensions;
use infra::club_interaction::ClubError;

use crate::error::AppError;

#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Uuid(uuid::Error),
    InvalidInput(String),
    NotFound(String),
    Unauthenticated(String),
    Forbidden(String),
    Internal(String),
}

impl GqlError {
    pub fn not_found(what: &str) -> Self {
        GqlError::NotFound(format!("{what} not found"))
    }

    pub fn code(&self) -> &'static str {
        match self {
            GqlError::Uuid(_) | GqlError::InvalidInput(_) => "INVALID_INPUT",
            GqlError::NotFound(_) => "NOT_FOUND",
            GqlError::Unauthenticated(_) => "UNAUTHENTICATED",
            GqlError::Forbidden(_) => "FORBIDDEN",
            GqlError::Sqlx(_) | GqlError::Internal(_) => "REMOTE_FAILURE",
        }
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) => {
                // Log the real error server-side; return a generic message to clients
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Uuid(e) => write!(f, "Invalid ID: {e}"),
            GqlError::InvalidInput(msg)
            | GqlError::NotFound(msg)
            | GqlError::Unauthenticated(msg)
            | GqlError::Forbidden(msg) => write!(f, "{msg}"),
            GqlError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for GqlError {}

impl ErrorExtensions for GqlError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<uuid::Error> for GqlError {
    fn from(e: uuid::Error) -> Self {
        GqlError::Uuid(e)
    }
}

impl From<ClubError> for GqlError {
    fn from(e: ClubError) -> Self {
        match e {
            ClubError::InvalidArgument(msg) | ClubError::InvalidInput(msg) => {
                GqlError::InvalidInput(msg)
            }
        }
    }
}

impl From<AppError> for GqlError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Db(e) => GqlError::Sqlx(e),
            AppError::Unauthorized(msg) => GqlError::Unauthenticated(msg),
            AppError::BadRequest(msg) => GqlError::InvalidInput(msg),
            AppError::NotFound(msg) => GqlError::NotFound(msg),
            AppError::Internal(msg) => GqlError::Internal(msg),
            AppError::Anyhow(e) => GqlError::Internal(e.to_string()),
        }
    }
}

/// Converts any `Result<T, E>` with `E: Into<GqlError>` into an
/// `async_graphql::Result<T>` that carries the error code.
///
/// Usage: `clubs::get_by_id(&state.db, id).await.coded()?`
pub trait CodedResultExt<T> {
    fn coded(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<GqlError>> CodedResultExt<T> for Result<T, E> {
    fn coded(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}
