use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::credential::ports::CredentialServicePort;

pub struct AppState<CS: CredentialServicePort> {
    pub credential_service: Arc<CS>,
}

impl<CS: CredentialServicePort> Clone for AppState<CS> {
    fn clone(&self) -> Self {
        Self {
            credential_service: Arc::clone(&self.credential_service),
        }
    }
}

/// Build the credential service router.
///
/// CORS is not applied here; the gateway owns cross-origin policy.
pub fn create_router<CS: CredentialServicePort>(
    credential_service: Arc<CS>,
    request_timeout: Duration,
) -> Router {
    let state = AppState { credential_service };

    let public_routes = Router::new()
        .route("/auth/register", post(register::<CS>))
        .route("/auth/login", post(login::<CS>))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/auth/me", get(me::<CS>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<CS>,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .with_state(state)
}
