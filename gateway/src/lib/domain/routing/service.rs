use std::sync::Arc;

use async_trait::async_trait;

use super::errors::ProxyError;
use super::errors::UpstreamError;
use super::models::InboundRequest;
use super::models::RouteTable;
use super::models::UpstreamResponse;
use super::ports::ProxyServicePort;
use super::ports::UpstreamClient;

/// Domain service that routes requests to upstream services.
///
/// Holds no per-request state; the route table is fixed at construction.
pub struct ProxyService<U>
where
    U: UpstreamClient,
{
    route_table: Arc<RouteTable>,
    upstream_client: Arc<U>,
}

impl<U> ProxyService<U>
where
    U: UpstreamClient,
{
    /// Create a new proxy service with injected dependencies.
    ///
    /// # Arguments
    /// * `route_table` - Validated prefix mapping
    /// * `upstream_client` - Transport used for matched requests
    pub fn new(route_table: Arc<RouteTable>, upstream_client: Arc<U>) -> Self {
        Self {
            route_table,
            upstream_client,
        }
    }
}

#[async_trait]
impl<U> ProxyServicePort for ProxyService<U>
where
    U: UpstreamClient,
{
    async fn forward(&self, request: InboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let outbound = self.route_table.plan(request)?;
        let route = outbound.route.clone();

        tracing::debug!(route = %route, method = %outbound.method, "Forwarding request");

        match self.upstream_client.send(outbound).await {
            Ok(response) => {
                tracing::debug!(
                    route = %route,
                    status = response.status.as_u16(),
                    "Upstream responded"
                );
                Ok(response)
            }
            Err(UpstreamError::Timeout(detail)) => {
                tracing::warn!(route = %route, error = %detail, "Upstream timed out");
                Err(ProxyError::UpstreamTimeout { route })
            }
            Err(UpstreamError::Unreachable(detail)) => {
                tracing::warn!(route = %route, error = %detail, "Upstream unreachable");
                Err(ProxyError::UpstreamUnreachable { route })
            }
            Err(UpstreamError::Internal(detail)) => Err(ProxyError::Internal(detail)),
        }
    }
}
