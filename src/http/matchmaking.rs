use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db::models::Outcome,
    error::CoreError,
    http::auth::AuthUser,
    matchmaking::queue::FindOutcome,
    state::AppState,
};

#[derive(Deserialize)]
pub struct RecordRequest {
    pub opponent_id: u64,
    /// `null` or `0` records a draw.
    #[serde(default)]
    pub winner_id: Option<u64>,
}

/// POST /match/queue
#[post("/match/queue")]
async fn join_queue(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, CoreError> {
    state
        .queue
        .enqueue(&state.users, &state.ledger, auth.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /match/find
///
/// Returns immediately; clients poll until they get an opponent.
#[post("/match/find")]
async fn find_match(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, CoreError> {
    let outcome = state
        .queue
        .find_match(&state.users, &state.ledger, auth.user_id)
        .await?;

    Ok(match outcome {
        FindOutcome::Matched(a) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "match_id": a.match_id,
            "opponent_id": a.opponent_id,
            "opponent_username": a.opponent_username,
            "opponent_elo": a.opponent_elo,
        })),
        FindOutcome::Pending => HttpResponse::Ok().json(serde_json::json!({ "status": "pending" })),
    })
}

/// POST /match/leave
#[post("/match/leave")]
async fn leave_queue(auth: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    let removed = state.queue.dequeue(auth.user_id).await;
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok", "removed": removed }))
}

/// POST /match/record
#[post("/match/record")]
async fn record(
    auth: AuthUser,
    info: web::Json<RecordRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    let res = state
        .ledger
        .record_result(
            &state.users,
            auth.user_id,
            info.opponent_id,
            Outcome::from_wire(info.winner_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "match_id": res.match_id,
        "elo_delta": res.elo_delta,
        "new_elo": res.new_elo,
    })))
}

/// Mount
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(join_queue)
        .service(find_match)
        .service(leave_queue)
        .service(record);
}
