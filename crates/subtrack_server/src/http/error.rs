//! Mapping from service outcomes to HTTP error replies.
//!
//! Error bodies are always `{"error": "<message>"}`. Internal failures are
//! logged with context here and replaced by a fixed message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;
use std::fmt::Display;
use subtrack_core::ServiceError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const INVALID_ID_MESSAGE: &str = "invalid subscription id";
pub const NOT_FOUND_MESSAGE: &str = "subscription not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal,
}

impl ApiError {
    /// Converts a service failure, logging it under `operation`.
    pub fn from_service(operation: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidId(value) => {
                warn!(
                    "event=http_request module=http status=rejected operation={operation} error_code=invalid_id value={value:?}"
                );
                Self::BadRequest(INVALID_ID_MESSAGE.to_string())
            }
            ServiceError::Validation(err) => {
                warn!(
                    "event=http_request module=http status=rejected operation={operation} error_code=validation error={err}"
                );
                Self::BadRequest(err.to_string())
            }
            ServiceError::NotFound(id) => {
                warn!(
                    "event=http_request module=http status=rejected operation={operation} error_code=not_found id={id}"
                );
                Self::NotFound
            }
            ServiceError::Repo(err) => Self::internal(operation, err),
        }
    }

    /// Logs an unexpected failure and hides its detail from the caller.
    pub fn internal(operation: &'static str, err: impl Display) -> Self {
        error!(
            "event=http_request module=http status=error operation={operation} error_code=internal error={err}"
        );
        Self::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) => message.as_str(),
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Internal => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
