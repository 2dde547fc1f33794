use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::error::Error;
use std::fmt;

use crate::storage::StorageError;
use crate::types::ErrorResponse;

/// The primary error type for the application.
///
/// Validation and not-found failures are expected outcomes and carry a message meant for the
/// caller. Storage and internal failures are logged server-side and answered with a fixed body.
#[derive(Debug)]
pub enum AppError {
    /// Caller input violates a precondition: bad id, empty title, empty patch.
    Validation(String),
    /// The referenced todo does not exist.
    NotFound(String),
    /// A request body that could not be decoded into the expected shape.
    UnprocessableBody(String),
    /// Backend-level fault, propagated unchanged from the storage layer.
    Storage(StorageError),
    /// Anything uncategorized.
    Internal(anyhow::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::UnprocessableBody(msg) => write!(f, "Unprocessable body: {}", msg),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Storage(e) => Some(e),
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnprocessableBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "TODO_NOT_FOUND",
            AppError::UnprocessableBody(_) => "REQUEST_VALIDATION_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.error_code();
        let (detail, error_id) = match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::UnprocessableBody(msg) => {
                (msg, None)
            }
            AppError::Storage(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Storage error: {:?}", e);
                ("A storage error occurred".to_string(), Some(error_id))
            }
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                ("Internal server error".to_string(), Some(error_id))
            }
        };

        let body = ErrorResponse { detail, error_code: error_code.to_string() };
        let mut response = (status, Json(body)).into_response();
        if let Some(error_id) = error_id {
            if let Ok(value) = HeaderValue::from_str(&error_id.to_string()) {
                response.headers_mut().insert(HeaderName::from_static("x-error-id"), value);
            }
        }
        response
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// Converts an `Option` into a `Result` with a `NotFound` error.
pub trait OptionExt<T> {
    fn ok_or_not_found(self, id: i64) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, id: i64) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("Todo with ID {} not found", id)))
    }
}

/// Request input checks shared by the service layer.
pub mod validation {
    use super::{AppError, AppResult};
    use crate::types::TITLE_MAX_CHARS;

    pub fn validate_id(id: i64) -> AppResult<()> {
        if id <= 0 {
            return Err(AppError::Validation("Todo ID must be a positive integer".to_string()));
        }
        Ok(())
    }

    /// Returns the trimmed title, or a validation error if it is blank or too long.
    pub fn normalize_title(title: &str) -> AppResult<String> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "Todo title cannot be empty or only whitespace".to_string(),
            ));
        }
        let len = trimmed.chars().count();
        if len > TITLE_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Todo title must be at most {} characters, got {}",
                TITLE_MAX_CHARS, len
            )));
        }
        Ok(trimmed.to_string())
    }
}
