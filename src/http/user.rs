use actix_web::{get, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::CoreError, http::auth::AuthUser, state::AppState};

#[derive(Serialize)]
pub struct Profile {
    pub user_id: u64,
    pub username: String,
    pub elo: i32,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub last_login: Option<DateTime<Utc>>,
}

/// GET /user/me
#[get("/user/me")]
pub async fn me(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, CoreError> {
    let u = state
        .users
        .get(auth.user_id)
        .await
        .ok_or(CoreError::UnknownUser(auth.user_id))?;

    Ok(HttpResponse::Ok().json(Profile {
        user_id: u.id,
        username: u.username,
        elo: u.elo,
        matches: u.matches_played,
        wins: u.wins,
        losses: u.losses,
        draws: u.draws,
        last_login: u.last_login,
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me);
}
