use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{BookingState, Operation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("cannot {operation} while in state {state}")]
    InvalidTransition {
        operation: Operation,
        state: BookingState,
    },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    ToolCall(#[from] ToolCallError),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Booking(BookingError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            AppError::Booking(BookingError::MissingField { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ToolCall(ToolCallError::UnknownTool(_)) => StatusCode::NOT_FOUND,
            AppError::ToolCall(ToolCallError::InvalidArguments { .. }) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SessionExists(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
