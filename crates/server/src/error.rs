use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad, missing or expired credential
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Acting outside the caller's role or ownership
    #[error("not permitted: {0}")]
    Authorization(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate request, slot collision or stale transition
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid request: {0}")]
    Validation(String),

    /// Store failure. Detail is logged, never returned to the caller.
    #[error("internal failure")]
    Persistence(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Authentication(_) => "authentication",
            Error::Authorization(_) => "authorization",
            Error::NotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::Validation(_) => "validation",
            Error::Persistence(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured form sent to callers over HTTP and the socket
    pub fn body(&self) -> ErrorBody {
        if let Error::Persistence(detail) = self {
            error!("[Store] {}", detail);
        }
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.body() }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

/// True when the failure is a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
