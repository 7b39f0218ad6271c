use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use gateway::config::CorsConfig;
use gateway::inbound::http::cors::cors_layer;
use gateway::inbound::http::router::create_router;
use gateway::outbound::upstream::HttpUpstreamClient;
use gateway::routing::models::Route;
use gateway::routing::models::RouteTable;
use gateway::routing::service::ProxyService;
use serde_json::json;
use tokio::net::TcpListener;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Upstream stand-in that echoes what it received.
pub struct StubUpstream {
    pub address: String,
    hits: Arc<AtomicUsize>,
}

impl StubUpstream {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));

        let router = Router::new()
            .route("/auth/register", post(conflict))
            .route("/auth/old-login", get(redirect))
            .fallback(echo)
            .with_state(Arc::clone(&hits));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Stub upstream error");
        });

        Self { address, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn echo(State(hits): State<Arc<AtomicUsize>>, request: Request) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    let mut headers = serde_json::Map::new();
    for name in parts.headers.keys() {
        let values: Vec<String> = parts
            .headers
            .get_all(name)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        headers.insert(name.to_string(), json!(values));
    }

    Json(json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "headers": headers,
        "body": String::from_utf8(body.to_vec()).unwrap(),
    }))
}

async fn conflict(State(hits): State<Arc<AtomicUsize>>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    (
        StatusCode::CONFLICT,
        [("x-upstream", "credential-service")],
        Json(json!({ "error": "user already exists" })),
    )
        .into_response()
}

async fn redirect(State(hits): State<Arc<AtomicUsize>>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, "/auth/login")
        .body(Body::empty())
        .unwrap()
}

/// Address on loopback with nothing listening.
pub async fn closed_port_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    address
}

/// Address on loopback that accepts connections and never answers.
pub async fn silent_upstream_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    address
}

/// Test application that spawns a real gateway in front of a stub upstream
pub struct TestApp {
    pub address: String,
    pub upstream: StubUpstream,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_timeouts(Duration::from_secs(10), Duration::from_secs(5)).await
    }

    /// Spawn the gateway with `/auth` on the stub, `/dead` on a closed port and
    /// `/silent` on an upstream that never answers
    pub async fn spawn_with_timeouts(request_timeout: Duration, upstream_timeout: Duration) -> Self {
        let upstream = StubUpstream::spawn().await;

        let route_table = RouteTable::new(vec![
            Route::new("auth", "/auth", &upstream.address).unwrap(),
            Route::new("dead", "/dead", &closed_port_address().await).unwrap(),
            Route::new("silent", "/silent", &silent_upstream_address().await).unwrap(),
        ])
        .unwrap();

        let cors = cors_layer(&CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: ["Origin", "Content-Type", "Authorization"]
                .map(String::from)
                .to_vec(),
            exposed_headers: vec!["Content-Length".to_string()],
            allow_credentials: true,
            max_age_secs: 43200,
        })
        .unwrap();

        let upstream_client =
            HttpUpstreamClient::new(upstream_timeout, Duration::from_secs(1)).unwrap();
        let proxy_service = Arc::new(ProxyService::new(
            Arc::new(route_table),
            Arc::new(upstream_client),
        ));
        let router = create_router(proxy_service, cors, request_timeout, MAX_BODY_BYTES);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let api_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            address,
            upstream,
            api_client,
        }
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .request(method, format!("{}{}", self.address, path))
    }
}
