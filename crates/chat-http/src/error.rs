//! HTTP client errors

use reqwest::StatusCode;
use thiserror::Error;

use chat_core::ModelError;

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected {0} in response body")]
    UnexpectedShape(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Connection limiter closed")]
    LimiterClosed,
}

impl HttpError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::InvalidHeader(_) => "INVALID_HEADER",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Json(_) => "INVALID_JSON",
            Self::UnexpectedShape(_) => "UNEXPECTED_SHAPE",
            Self::Model(e) => e.code(),
            Self::LimiterClosed => "LIMITER_CLOSED",
        }
    }

    /// HTTP status of an error response, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Check if the API answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Check if the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
