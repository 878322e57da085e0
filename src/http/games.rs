//! Player match-history queries.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{error::CoreError, http::auth::AuthUser, state::AppState};

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Win,
    Loss,
    Draw,
}

#[derive(Serialize)]
pub struct GameSummary {
    pub match_id: u64,
    pub opponent_id: u64,
    pub opponent_username: Option<String>,
    pub winner_id: Option<u64>,
    pub result: ResultKind,
    pub elo_delta: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// GET /match/history
#[get("/match/history")]
pub async fn history(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, CoreError> {
    let me = auth.user_id;
    let records = state
        .ledger
        .history(me, state.settings.history_limit)
        .await;

    let mut matches = Vec::with_capacity(records.len());
    for r in records {
        let opponent_id = r.opponent_of(me);
        matches.push(GameSummary {
            match_id: r.match_id,
            opponent_id,
            opponent_username: state.users.username_of(opponent_id).await,
            winner_id: r.winner_id,
            result: match r.winner_id {
                None => ResultKind::Draw,
                Some(w) if w == me => ResultKind::Win,
                Some(_) => ResultKind::Loss,
            },
            elo_delta: r.delta_for(me),
            created_at: r.created_at,
        });
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "matches": matches })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(history);
}
