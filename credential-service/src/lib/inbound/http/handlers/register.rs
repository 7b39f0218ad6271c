use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credential::errors::CredentialError;
use crate::credential::models::RegisterCommand;
use crate::credential::models::RegisteredUser;
use crate::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<CS: CredentialServicePort>(
    State(state): State<AppState<CS>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .credential_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registration (raw JSON)
///
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        RegisterCommand::new(self.email, self.password)
            .map_err(|errors| CredentialError::from(errors).into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub message: &'static str,
    pub user_id: String,
    pub email: String,
}

impl From<&RegisteredUser> for RegisterResponseData {
    fn from(user: &RegisteredUser) -> Self {
        Self {
            message: "User registered successfully",
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}
