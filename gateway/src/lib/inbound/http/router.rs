use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::forward::forward;
use super::handlers::health::health;
use crate::routing::ports::ProxyServicePort;

pub struct AppState<PS: ProxyServicePort> {
    pub proxy_service: Arc<PS>,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl<PS: ProxyServicePort> Clone for AppState<PS> {
    fn clone(&self) -> Self {
        Self {
            proxy_service: Arc::clone(&self.proxy_service),
            max_body_bytes: self.max_body_bytes,
            request_timeout: self.request_timeout,
        }
    }
}

/// Build the gateway router.
///
/// `GET /health` is answered locally; everything else goes to the forwarding
/// fallback, which enforces `request_timeout` itself so an expired deadline
/// answers 504. CORS is the outermost layer, so preflights are answered here
/// and never reach an upstream.
pub fn create_router<PS: ProxyServicePort>(
    proxy_service: Arc<PS>,
    cors: CorsLayer,
    request_timeout: Duration,
    max_body_bytes: usize,
) -> Router {
    let state = AppState {
        proxy_service,
        max_body_bytes,
        request_timeout,
    };

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
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
        .route("/health", get(health))
        .fallback(forward::<PS>)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
