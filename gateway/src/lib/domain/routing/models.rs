use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use bytes::Bytes;

use super::errors::ProxyError;
use super::errors::RouteError;

/// Headers that describe a single transport hop and are never relayed.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Base address of an upstream service: scheme and authority only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrl(String);

impl UpstreamUrl {
    /// Parse an absolute `http`/`https` base address.
    ///
    /// # Errors
    /// * `InvalidUpstream` - Not absolute, unsupported scheme, or carries a path or query
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidUpstream {
            upstream: raw.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = raw.parse().map_err(|_| invalid("not a valid URI"))?;

        let scheme = match uri.scheme_str() {
            Some(scheme @ ("http" | "https")) => scheme,
            Some(_) => return Err(invalid("scheme must be http or https")),
            None => return Err(invalid("missing scheme")),
        };
        let authority = uri.authority().ok_or_else(|| invalid("missing host"))?;
        if authority.host().is_empty() {
            return Err(invalid("missing host"));
        }
        if !matches!(uri.path(), "" | "/") || uri.query().is_some() {
            return Err(invalid("must not carry a path or query"));
        }

        Ok(Self(format!("{}://{}", scheme, authority)))
    }

    /// Full target URL for an inbound path and query.
    pub fn join(&self, path_and_query: &str) -> String {
        format!("{}{}", self.0, path_and_query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A configured prefix owned by one upstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    prefix: String,
    upstream: UpstreamUrl,
}

impl Route {
    /// # Errors
    /// * `InvalidPrefix` - Prefix does not start with `/`
    /// * `InvalidUpstream` - Upstream address is not a valid base URL
    pub fn new(name: &str, prefix: &str, upstream: &str) -> Result<Self, RouteError> {
        if !prefix.starts_with('/') {
            return Err(RouteError::InvalidPrefix(prefix.to_string()));
        }

        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() { "/" } else { trimmed };

        Ok(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            upstream: UpstreamUrl::parse(upstream)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream(&self) -> &UpstreamUrl {
        &self.upstream
    }

    /// Segment-aware prefix match: `/auth` covers `/auth` and `/auth/...` but not `/authx`.
    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }

        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Immutable prefix-to-upstream mapping, ordered longest prefix first.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// # Errors
    /// * `DuplicatePrefix` - Two routes claim the same prefix
    pub fn new(mut routes: Vec<Route>) -> Result<Self, RouteError> {
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));

        if let Some(pair) = routes.windows(2).find(|pair| pair[0].prefix == pair[1].prefix) {
            return Err(RouteError::DuplicatePrefix(pair[0].prefix.clone()));
        }

        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Most specific route owning `path`, if any.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Build the outbound request for `request`.
    ///
    /// Only the scheme, host and port change. Method, path, query, end-to-end
    /// headers and body are carried over unchanged.
    ///
    /// # Errors
    /// * `RouteNotFound` - No configured prefix owns the path
    pub fn plan(&self, request: InboundRequest) -> Result<OutboundRequest, ProxyError> {
        let route = self
            .resolve(request.uri.path())
            .ok_or_else(|| ProxyError::RouteNotFound(request.uri.path().to_string()))?;

        let path_and_query = request
            .uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or("/");

        let mut headers = end_to_end_headers(&request.headers);
        headers.remove(header::HOST);

        Ok(OutboundRequest {
            route: route.name.clone(),
            method: request.method,
            url: route.upstream.join(path_and_query),
            headers,
            body: request.body,
        })
    }
}

/// Copy of `headers` without hop-by-hop headers, including any named in `Connection`.
pub fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    let mut forwarded = headers.clone();
    for name in HOP_BY_HOP.iter().chain(connection_listed.iter()) {
        forwarded.remove(name);
    }
    forwarded
}

/// Request as received by the gateway, body fully buffered.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Request to send to the upstream owning the route.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub route: String,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream reply, relayed to the caller as-is.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}
