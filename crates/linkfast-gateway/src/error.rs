use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkfast_redirector::RedirectorError;
use linkfast_shortener::ShortenerError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    InvalidJson,
    InvalidUrl,
    ServerError,
    SaveFailed,
    NotFound,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidJson => (StatusCode::BAD_REQUEST, "invalid json"),
            AppError::InvalidUrl => (StatusCode::BAD_REQUEST, "invalid url format"),
            AppError::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "server error"),
            AppError::SaveFailed => (StatusCode::INTERNAL_SERVER_ERROR, "failed to save url"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found"),
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        match value {
            ShortenerError::InvalidUrl(_) => AppError::InvalidUrl,
            ShortenerError::GenerationFailure(_) | ShortenerError::GenerationExhausted { .. } => {
                error!(error = %value, "short code generation failed");
                AppError::ServerError
            }
            ShortenerError::Persistence(_) => AppError::SaveFailed,
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(value: RedirectorError) -> Self {
        match value {
            RedirectorError::NotFound(_) => AppError::NotFound,
            RedirectorError::Storage(source) => {
                error!(error = %source, "redirect lookup failed");
                AppError::ServerError
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = ErrorResponse {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
