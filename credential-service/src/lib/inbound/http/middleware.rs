use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and adds the user to request extensions
pub async fn authenticate<CS: CredentialServicePort>(
    State(state): State<AppState<CS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?.to_owned();

    let user_id = state
        .credential_service
        .authenticate(&token)
        .await
        .map_err(|e| {
            tracing::warn!(kind = e.kind(), "Bearer token rejected");
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
        )),
    }
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized("token_invalid", message.to_string()).into_response()
}
