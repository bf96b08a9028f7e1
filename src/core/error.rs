use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::templates::TemplateError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// The object store rejected the request
    #[error("Storage error: {0}")]
    Storage(String),

    /// A backend could not be reached or answered with a server error
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Coarse failure classes, each with its own user message and retry hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input was rejected before any backend was contacted
    Validation,
    /// Network or capacity trouble; the same request may succeed later
    Transient,
    /// The backend refused the request or something is broken
    Permanent,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => FailureKind::Validation,
            AppError::Unavailable(_) => FailureKind::Transient,
            AppError::Database(e) if is_transient_db_error(e) => FailureKind::Transient,
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Storage(_)
            | AppError::Template(_) => FailureKind::Permanent,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Transient
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(e) if is_transient_db_error(e) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) | AppError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn is_transient_db_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error occurred".to_string(), None)
            }
            AppError::Validation(ref msg) => (msg.clone(), Some(vec![msg.clone()])),
            AppError::BadRequest(ref msg) => (msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                ("Storage service rejected the request".to_string(), None)
            }
            AppError::Unavailable(ref msg) => {
                tracing::warn!("Backend unavailable: {}", msg);
                ("Service temporarily unavailable".to_string(), None)
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {}", e);
                ("Internal server error".to_string(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
