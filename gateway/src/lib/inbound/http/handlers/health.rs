use axum::Json;
use serde::Serialize;

pub async fn health() -> Json<HealthResponseData> {
    Json(HealthResponseData {
        service: "gateway",
        status: "active",
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub service: &'static str,
    pub status: &'static str,
}
