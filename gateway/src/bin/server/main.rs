use std::sync::Arc;
use std::time::Duration;

use gateway::config::Config;
use gateway::inbound::http::cors::cors_layer;
use gateway::inbound::http::router::create_router;
use gateway::outbound::upstream::HttpUpstreamClient;
use gateway::routing::service::ProxyService;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gateway",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    let route_table = Arc::new(config.route_table()?);
    for route in route_table.routes() {
        tracing::info!(
            route = route.name(),
            prefix = route.prefix(),
            upstream = route.upstream().as_str(),
            "Route registered"
        );
    }

    let cors = cors_layer(&config.cors)?;
    tracing::info!(
        allowed_origins = ?config.cors.allowed_origins,
        allow_credentials = config.cors.allow_credentials,
        "CORS policy loaded"
    );

    let upstream_client = Arc::new(HttpUpstreamClient::new(
        Duration::from_secs(config.proxy.timeout_secs),
        Duration::from_secs(config.proxy.connect_timeout_secs),
    )?);
    let proxy_service = Arc::new(ProxyService::new(route_table, upstream_client));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        proxy_service,
        cors,
        Duration::from_secs(config.server.request_timeout_secs),
        config.proxy.max_body_bytes,
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
