//! Notes Error Types
//!
//! This module provides notes-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Notes-specific result type alias
pub type NotesResult<T> = Result<T, NotesError>;

/// Notes-specific error variants
///
/// These map to appropriate HTTP status codes and can be converted to
/// `AppError` for unified error handling. The Display string doubles as the
/// response body message, so every error response has the shape
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum NotesError {
    /// Note content missing or empty
    #[error("content is empty")]
    EmptyContent,

    /// No note with the requested id
    #[error("note not found")]
    NoteNotFound,

    /// Request gate rejection. Covers rate-exceeded, missing identity and
    /// counter-store failure alike; callers get no further detail.
    #[error("too many requests")]
    RateLimited,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl NotesError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotesError::EmptyContent => StatusCode::BAD_REQUEST,
            NotesError::NoteNotFound => StatusCode::NOT_FOUND,
            NotesError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            NotesError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotesError::EmptyContent => ErrorKind::BadRequest,
            NotesError::NoteNotFound => ErrorKind::NotFound,
            NotesError::RateLimited => ErrorKind::TooManyRequests,
            NotesError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            NotesError::Database(e) => {
                tracing::error!(error = %e, "Notes database error");
            }
            NotesError::RateLimited => {
                tracing::warn!("Request rejected by rate limiter");
            }
            _ => {
                tracing::debug!(error = %self, "Notes error");
            }
        }
    }

    /// Message exposed in the response body. Database details stay in the
    /// logs.
    fn public_message(&self) -> String {
        match self {
            NotesError::Database(_) => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<NotesError> for AppError {
    fn from(err: NotesError) -> Self {
        let kind = err.kind();
        let message = err.public_message();
        AppError::new(kind, message)
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}
