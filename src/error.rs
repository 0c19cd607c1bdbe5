use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::views;

/// Errors surfaced to HTTP clients. Every variant renders as a fragment so
/// the layout rule applies to error pages as well.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn from_internal(error: impl std::error::Error) -> Self {
        Self::Internal(error.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let fragment = match &self {
            AppError::NotFound => views::not_found(),
            AppError::BadRequest(message) => views::error(message),
            // Don't expose internal error details
            AppError::Internal(_) => views::error("internal error"),
        };
        (self.status_code(), fragment).into_response()
    }
}
