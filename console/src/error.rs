//! Console error type

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("IPAM backend unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("IPAM backend answered HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Failed to read request body: {0}")]
    Body(String),
}

impl ConsoleError {
    pub fn status(&self) -> StatusCode {
        match self {
            ConsoleError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ConsoleError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
