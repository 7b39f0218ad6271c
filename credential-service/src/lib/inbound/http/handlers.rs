use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::CredentialError;
use crate::credential::errors::FieldViolation;

pub mod health;
pub mod login;
pub mod me;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Caller-facing error. Each variant carries its stable kind and a message
/// that is safe to show; internal detail is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String, Vec<FieldViolation>),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    Unauthorized(&'static str, String),
}

impl ApiError {
    pub fn unauthorized(err: CredentialError) -> Self {
        ApiError::Unauthorized(err.kind(), err.to_string())
    }
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
            ApiError::BadRequest(message, details) => (
                StatusCode::BAD_REQUEST,
                ApiErrorData {
                    error: message,
                    kind: "validation_error",
                    details,
                },
            ),
            ApiError::NotFound(kind, message) => {
                (StatusCode::NOT_FOUND, ApiErrorData::new(kind, message))
            }
            ApiError::Conflict(kind, message) => {
                (StatusCode::CONFLICT, ApiErrorData::new(kind, message))
            }
            ApiError::Unauthorized(kind, message) => {
                (StatusCode::UNAUTHORIZED, ApiErrorData::new(kind, message))
            }
        };

        (status, Json(data)).into_response()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(errors) => ApiError::BadRequest(
                "validation failed".to_string(),
                errors.violations().to_vec(),
            ),
            CredentialError::DuplicateAccount => ApiError::Conflict(err.kind(), err.to_string()),
            CredentialError::InvalidCredentials
            | CredentialError::TokenInvalid
            | CredentialError::TokenExpired => ApiError::unauthorized(err),
            CredentialError::UserNotFound => ApiError::NotFound(err.kind(), err.to_string()),
            CredentialError::Internal(detail) => ApiError::InternalServerError(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        ApiError::BadRequest("malformed JSON body".to_string(), Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

impl ApiErrorData {
    fn new(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
            details: Vec::new(),
        }
    }
}
