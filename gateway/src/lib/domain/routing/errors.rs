use thiserror::Error;

/// Invalid route configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route prefix `{0}` must start with '/'")]
    InvalidPrefix(String),

    #[error("Route prefix `{0}` is configured more than once")]
    DuplicatePrefix(String),

    #[error("Invalid upstream `{upstream}`: {reason}")]
    InvalidUpstream { upstream: String, reason: String },
}

/// Transport failure reported by an upstream client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Upstream request could not be built: {0}")]
    Internal(String),
}

/// Reasons the gateway answers a request itself instead of relaying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("No route for path `{0}`")]
    RouteNotFound(String),

    #[error("Upstream `{route}` is unreachable")]
    UpstreamUnreachable { route: String },

    #[error("Upstream `{route}` did not respond in time")]
    UpstreamTimeout { route: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::RouteNotFound(_) => "not_found",
            ProxyError::UpstreamUnreachable { .. } => "upstream_unreachable",
            ProxyError::UpstreamTimeout { .. } => "upstream_timeout",
            ProxyError::Internal(_) => "internal_error",
        }
    }
}
