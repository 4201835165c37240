//! Terminal HTTP error responses.

use crate::views;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use roster_core::StudentServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that end a request without rendering a form.
#[derive(Debug)]
pub enum WebError {
    /// Unknown or malformed student id.
    NotFound,
    /// Storage or state failure; details are logged, not shown.
    Internal(String),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for WebError {}

impl From<StudentServiceError> for WebError {
    fn from(value: StudentServiceError) -> Self {
        match value {
            StudentServiceError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, views::not_found_page()).into_response(),
            Self::Internal(message) => {
                error!("event=request_failed module=web status=error error={message}");
                (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
            }
        }
    }
}
