use std::collections::BTreeMap;
use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::routing::errors::RouteError;
use crate::routing::models::Route;
use crate::routing::models::RouteTable;

/// Application configuration for the gateway.
///
/// Loaded once at startup and passed by value into constructors.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub routes: BTreeMap<String, RouteConfig>,
    pub cors: CorsConfig,
    pub proxy: ProxyConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
}

/// One upstream mapping, keyed by route name in `routes`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub prefix: String,
    pub upstream: String,
}

/// Cross-origin policy enforced at the gateway for every route.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: u64,
}

/// Upstream client limits.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProxyConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_body_bytes: usize,
}

const LIST_KEYS: [&str; 4] = [
    "cors.allowed_origins",
    "cors.allowed_methods",
    "cors.allowed_headers",
    "cors.exposed_headers",
];

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (GATEWAY_ROUTES__AUTH__UPSTREAM, GATEWAY_CORS__ALLOWED_ORIGINS, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Local development defaults below
    ///
    /// # Errors
    /// Returns error if required configuration values are missing or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let environment = LIST_KEYS.iter().fold(
            Environment::with_prefix("GATEWAY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .try_parsing(true),
            |environment, key| environment.with_list_parse_key(key),
        );

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("routes.auth.prefix", "/auth")?
            .set_default("routes.auth.upstream", "http://localhost:5001")?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default(
                "cors.allowed_methods",
                vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"],
            )?
            .set_default(
                "cors.allowed_headers",
                vec!["Origin", "Content-Type", "Authorization"],
            )?
            .set_default("cors.exposed_headers", vec!["Content-Length"])?
            .set_default("cors.allow_credentials", true)?
            .set_default("cors.max_age_secs", 12 * 60 * 60)?
            .set_default("proxy.timeout_secs", 15)?
            .set_default("proxy.connect_timeout_secs", 3)?
            .set_default("proxy.max_body_bytes", 2 * 1024 * 1024)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: GATEWAY_ROUTES__AUTH__UPSTREAM=http://auth:5001 overrides routes.auth.upstream
            .add_source(environment)
            .build()?;

        configuration.try_deserialize()
    }

    /// Build the validated route table from `routes`.
    ///
    /// # Errors
    /// * `RouteError` - A prefix or upstream address is invalid, or a prefix repeats
    pub fn route_table(&self) -> Result<RouteTable, RouteError> {
        let routes = self
            .routes
            .iter()
            .map(|(name, route)| Route::new(name, &route.prefix, &route.upstream))
            .collect::<Result<Vec<_>, _>>()?;

        RouteTable::new(routes)
    }
}
