use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credential::errors::CredentialError;
use crate::credential::models::AccessToken;
use crate::credential::models::LoginCommand;
use crate::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<CS: CredentialServicePort>(
    State(state): State<AppState<CS>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;
    let command = LoginCommand::new(body.email, body.password).map_err(CredentialError::from)?;

    state
        .credential_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref token| ApiSuccess::new(StatusCode::OK, token.into()))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

impl From<&AccessToken> for LoginResponseData {
    fn from(token: &AccessToken) -> Self {
        Self {
            token: token.token.clone(),
        }
    }
}
