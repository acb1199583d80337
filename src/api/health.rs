use crate::database::MongoDB;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

/// GET / - Liveness text for uptime checks
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("CureCamp server is running")
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthResponse),
        (status = 503, description = "Database ping failed", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<MongoDB>) -> impl Responder {
    let (database, mut response) = match db.ping().await {
        Ok(()) => ("connected", HttpResponse::Ok()),
        Err(e) => {
            log::error!("❌ Health check: database ping failed: {}", e);
            ("unreachable", HttpResponse::ServiceUnavailable())
        }
    };

    response.json(HealthResponse {
        status: if database == "connected" { "healthy" } else { "degraded" }.to_string(),
        service: "curecamp-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
