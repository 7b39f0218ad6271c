use std::time::Duration;

use async_trait::async_trait;

use crate::routing::errors::UpstreamError;
use crate::routing::models::end_to_end_headers;
use crate::routing::models::OutboundRequest;
use crate::routing::models::UpstreamResponse;
use crate::routing::ports::UpstreamClient;

/// Upstream client over a pooled reqwest connection set.
///
/// Redirects are returned to the caller, not followed, and bodies are relayed
/// without content decoding.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    /// # Arguments
    /// * `timeout` - Deadline for the whole upstream exchange
    /// * `connect_timeout` - Deadline for establishing the connection
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(err.to_string())
    } else if err.is_builder() {
        UpstreamError::Internal(err.to_string())
    } else {
        UpstreamError::Unreachable(err.to_string())
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let mut upstream_request = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if !request.body.is_empty() {
            upstream_request = upstream_request.body(request.body);
        }

        let response = upstream_request.send().await.map_err(classify)?;

        let status = response.status();
        let headers = end_to_end_headers(response.headers());
        let body = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
