//! HTTP error responses
//!
//! Maps bad input and missing rooms onto distinct statuses with a JSON
//! error body, so a controller can tell a malformed request apart from a
//! room that expired or never existed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::command::CommandError;
use crate::registry::RegistryError;

/// Error type for HTTP handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Unknown, expired, or deleted room code
    RoomNotFound,
    /// Command body rejected before reaching the registry
    InvalidCommand(CommandError),
}

/// JSON body carried by every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::RoomNotFound => (StatusCode::NOT_FOUND, "Room not found".to_string()),
            ApiError::InvalidCommand(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError::InvalidCommand(err)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::RoomNotFound(_) => ApiError::RoomNotFound,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RoomNotFound => write!(f, "Room not found"),
            ApiError::InvalidCommand(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}
