use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failure of a single call to the remote todo backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("record has no {0}")]
    MissingField(&'static str),

    #[error("record field {field} has unparsable date '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// Why a completion toggle was not saved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("team todo {0} is not loaded")]
    TodoNotFound(i64),

    #[error("team todo {0} has no team id")]
    MissingTeamId(i64),

    #[error(transparent)]
    Write(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Login required")]
    Unauthorized,

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Login required".to_string()),
            AppError::Fetch(e) => {
                error!("backend error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Backend request failed".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
