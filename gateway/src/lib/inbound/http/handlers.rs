use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::routing::errors::ProxyError;

pub mod forward;
pub mod health;

/// Errors produced by the gateway itself.
///
/// Upstream error responses never pass through here; they are relayed as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    RequestTimeout,
    NotFound(String),
    BadGateway(String),
    GatewayTimeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, data) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorData::new("internal_error", "internal server error"),
                )
            }
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorData::new("bad_request", message),
            ),
            ApiError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                ApiErrorData::new("request_timeout", "request body was not received in time"),
            ),
            ApiError::NotFound(path) => {
                tracing::debug!(path = %path, "No route matched");
                (
                    StatusCode::NOT_FOUND,
                    ApiErrorData::new("not_found", "not found"),
                )
            }
            ApiError::BadGateway(message) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorData::new("upstream_unreachable", message),
            ),
            ApiError::GatewayTimeout(message) => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiErrorData::new("upstream_timeout", message),
            ),
        };

        (status, Json(data)).into_response()
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::RouteNotFound(path) => ApiError::NotFound(path),
            ProxyError::UpstreamUnreachable { .. } => ApiError::BadGateway(err.to_string()),
            ProxyError::UpstreamTimeout { .. } => ApiError::GatewayTimeout(err.to_string()),
            ProxyError::Internal(detail) => ApiError::InternalServerError(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub error: String,
    pub kind: &'static str,
}

impl ApiErrorData {
    fn new(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
        }
    }
}
