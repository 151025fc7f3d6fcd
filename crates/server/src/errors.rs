use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": <title>, "message": <detail>, "code": <code>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
    pub code: Option<u16>,
}

#[derive(Serialize)]
struct Body<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, code: None }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, title) = match &e {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            ServiceError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "Cancelled"),
            ServiceError::DeadlineExceeded => (StatusCode::GATEWAY_TIMEOUT, "Deadline Exceeded"),
            ServiceError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Repository Error"),
            ServiceError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream Error"),
        };
        let message = match &e {
            ServiceError::Validation(m)
            | ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::Repository(m)
            | ServiceError::Upstream(m) => m.clone(),
            other => other.to_string(),
        };
        Self { status, error: title, message: Some(message), code: Some(e.code()) }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), code = ?self.code, message = ?self.message, "request failed");
        } else {
            warn!(status = self.status.as_u16(), code = ?self.code, message = ?self.message, "request rejected");
        }
        let body = Body { error: self.error, message: self.message.as_deref(), code: self.code };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
