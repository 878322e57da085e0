// src/http/leaderboard.rs

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Maximum number of entries to return; capped by `leaderboard_max`.
    pub limit: Option<usize>,
}

#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<AppState>,
    web::Query(params): web::Query<LeaderboardParams>,
) -> HttpResponse {
    let max = state.settings.leaderboard_max;
    let limit = params.limit.unwrap_or(max).min(max);
    let rows = state.leaderboard.top(&state.users, limit).await;
    HttpResponse::Ok().json(serde_json::json!({ "leaderboard": rows }))
}

/// Mounts the leaderboard route
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard);
}
