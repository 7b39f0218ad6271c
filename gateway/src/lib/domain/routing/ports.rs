use async_trait::async_trait;

use super::errors::ProxyError;
use super::errors::UpstreamError;
use super::models::InboundRequest;
use super::models::OutboundRequest;
use super::models::UpstreamResponse;

/// Port for gateway domain service operations.
#[async_trait]
pub trait ProxyServicePort: Send + Sync + 'static {
    /// Relay a request to the upstream owning its path.
    ///
    /// # Returns
    /// The upstream response, whatever its status
    ///
    /// # Errors
    /// * `RouteNotFound` - No configured prefix matches; nothing was sent
    /// * `UpstreamUnreachable` - Connection to the upstream failed
    /// * `UpstreamTimeout` - The upstream did not answer in time
    async fn forward(&self, request: InboundRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// Port for the transport that talks to upstream services.
#[async_trait]
pub trait UpstreamClient: Send + Sync + 'static {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError>;
}
