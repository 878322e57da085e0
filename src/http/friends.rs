//! Friend requests and lists (request / accept / reject / list / pending / recommendations)

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::{error::CoreError, http::auth::AuthUser, state::AppState};

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct FriendReq {
    pub friend_id: u64,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /friends/request
#[post("/friends/request")]
pub async fn request(
    auth: AuthUser,
    info: web::Json<FriendReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    state
        .social
        .send_request(&state.users, auth.user_id, info.friend_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /friends/accept
#[post("/friends/accept")]
pub async fn accept(
    auth: AuthUser,
    info: web::Json<FriendReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    state.social.accept_request(auth.user_id, info.friend_id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /friends/reject
#[post("/friends/reject")]
pub async fn reject(
    auth: AuthUser,
    info: web::Json<FriendReq>,
    state: web::Data<AppState>,
) -> HttpResponse {
    state.social.reject_request(auth.user_id, info.friend_id);
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// GET /friends/list
#[get("/friends/list")]
pub async fn list(auth: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    let ids = state.social.friends_of(auth.user_id);
    let friends = state.users.summaries(&ids).await;
    HttpResponse::Ok().json(serde_json::json!({ "friends": friends }))
}

/// GET /friends/pending
#[get("/friends/pending")]
pub async fn pending(auth: AuthUser, state: web::Data<AppState>) -> HttpResponse {
    let ids = state.social.pending_for(auth.user_id);
    let pending = state.users.summaries(&ids).await;
    HttpResponse::Ok().json(serde_json::json!({ "pending": pending }))
}

/// GET /friends/recommendations
#[get("/friends/recommendations")]
pub async fn recommendations(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    let recs = state
        .social
        .recommendations(
            &state.users,
            auth.user_id,
            state.settings.recommendation_limit,
        )
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "recommendations": recs })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(request)
        .service(accept)
        .service(reject)
        .service(list)
        .service(pending)
        .service(recommendations);
}
