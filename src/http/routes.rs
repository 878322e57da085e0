use crate::{error::CoreError, http};
use actix_web::{web, HttpResponse};

/// Mount every HTTP sub-module at the root, where the web client expects
/// them, and make extractor failures speak the `{"error": ...}` shape.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        CoreError::InvalidInput(format!("invalid JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        CoreError::InvalidInput(format!("invalid query: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        CoreError::InvalidInput(format!("invalid path: {err}")).into()
    }))
    .configure(http::auth::init_routes)
    .configure(http::user::init_routes)
    .configure(http::matchmaking::init_routes)
    .configure(http::games::init_routes)
    .configure(http::leaderboard::init_routes)
    .configure(http::friends::init_routes)
    .configure(http::users::init_routes)
    .configure(http::presence::init_routes)
    .configure(http::health::init_routes)
    .default_service(web::to(|| async {
        HttpResponse::NotFound().json(serde_json::json!({ "error": "not found" }))
    }));
}
