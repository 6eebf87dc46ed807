//! HTTP error mapping

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use council_application::{DeliberationError, RunDebateError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown constitution: {0}")]
    UnknownConstitution(String),

    #[error("Unknown council: {0}")]
    UnknownCouncil(String),

    /// Well-formed request that cannot start a deliberation
    #[error("{message}")]
    Unprocessable { code: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::UnknownConstitution(_) => (StatusCode::NOT_FOUND, "UNKNOWN_CONSTITUTION"),
            ApiError::UnknownCouncil(_) => (StatusCode::NOT_FOUND, "UNKNOWN_COUNCIL"),
            ApiError::Unprocessable { code, .. } => (StatusCode::UNPROCESSABLE_ENTITY, code),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::UnknownConstitution(id) => Some(serde_json::json!({"constitution": id})),
            ApiError::UnknownCouncil(id) => Some(serde_json::json!({"council_config_id": id})),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<RunDebateError> for ApiError {
    fn from(e: RunDebateError) -> Self {
        match e {
            RunDebateError::NoHouseRules => ApiError::Unprocessable {
                code: "NO_HOUSE_RULES",
                message: e.to_string(),
            },
            RunDebateError::InvalidMaxRounds => ApiError::Unprocessable {
                code: "INVALID_MAX_ROUNDS",
                message: e.to_string(),
            },
            RunDebateError::Domain(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}

impl From<DeliberationError> for ApiError {
    fn from(e: DeliberationError) -> Self {
        match e {
            DeliberationError::Debate(inner) => inner.into(),
            DeliberationError::Domain(inner) if inner.is_council_config() => {
                ApiError::Unprocessable {
                    code: "INVALID_COUNCIL_CONFIG",
                    message: inner.to_string(),
                }
            }
            DeliberationError::Domain(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}
