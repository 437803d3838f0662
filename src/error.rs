//! HTTP error mapping.
//!
//! Every failure leaving a handler becomes an [`ApiError`], rendered as
//! `{"error": "<message>"}` with a 400, 404 or 500 status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use raceapp_tasks::TaskError;
use serde::Serialize;
use thiserror::Error;

use crate::logs::LogError;

/// Error returned by the HTTP handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request is malformed or arrived too early.
    #[error("{0}")]
    BadRequest(String),

    /// The requested logs or task do not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<LogError> for ApiError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::BadInput(msg) => Self::BadRequest(msg),
            LogError::NotFound(msg) => Self::NotFound(msg),
            LogError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<TaskError<LogError>> for ApiError {
    fn from(err: TaskError<LogError>) -> Self {
        match err {
            TaskError::NotFound { .. } => Self::NotFound(err.to_string()),
            TaskError::NotReady { .. } => Self::BadRequest(err.to_string()),
            TaskError::Failed { cause, .. } => cause.into(),
            TaskError::TimedOut { .. } | TaskError::Aborted { .. } => {
                Self::Internal(err.to_string())
            },
        }
    }
}
