use axum::body::Body;
use axum::extract::Request;
use axum::extract::State;
use axum::response::Response;
use tokio::time::timeout_at;
use tokio::time::Instant;

use super::ApiError;
use crate::inbound::http::router::AppState;
use crate::routing::models::InboundRequest;
use crate::routing::models::UpstreamResponse;
use crate::routing::ports::ProxyServicePort;

/// Fallback handler: every request without a local route is relayed.
///
/// One deadline covers reading the body and the upstream exchange. Running out
/// while waiting on the upstream is a 504, never a 408.
pub async fn forward<PS: ProxyServicePort>(
    State(state): State<AppState<PS>>,
    request: Request,
) -> Result<Response, ApiError> {
    let deadline = Instant::now() + state.request_timeout;
    let (parts, body) = request.into_parts();

    let body = timeout_at(deadline, axum::body::to_bytes(body, state.max_body_bytes))
        .await
        .map_err(|_| ApiError::RequestTimeout)?
        .map_err(|e| {
            tracing::debug!(error = %e, "Request body rejected");
            ApiError::BadRequest("request body is unreadable or too large".to_string())
        })?;

    let forwarded = state.proxy_service.forward(InboundRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });

    let upstream = timeout_at(deadline, forwarded).await.map_err(|_| {
        tracing::warn!("Request deadline elapsed while waiting on upstream");
        ApiError::GatewayTimeout("Upstream did not respond in time".to_string())
    })??;

    Ok(relay(upstream))
}

fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = upstream.headers;
    response
}
