// src/http/presence.rs
//! Very thin presence API backed by live sessions.

use actix_web::{get, web, HttpResponse};

use crate::{error::CoreError, state::AppState};

#[get("/presence/online/{user_id}")]
pub async fn online(
    path: web::Path<u64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    let uid = path.into_inner();
    if !state.users.exists(uid).await {
        return Err(CoreError::UnknownUser(uid));
    }
    let online = state.auth.is_online(uid);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "online": online })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(online);
}
