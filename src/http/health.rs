//! Simple liveness probe and domain metrics.

use actix_web::{get, web, HttpResponse};

use crate::{error::CoreError, metrics};

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/metrics/core")]
pub async fn core_metrics() -> Result<HttpResponse, CoreError> {
    let body = metrics::render_core().map_err(|e| CoreError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(core_metrics);
}
