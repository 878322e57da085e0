use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::{error::CoreError, http::auth::AuthUser, state::AppState};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /users/search?q=
#[get("/users/search")]
pub async fn search(
    auth: AuthUser,
    state: web::Data<AppState>,
    web::Query(params): web::Query<SearchParams>,
) -> Result<HttpResponse, CoreError> {
    let users = state
        .social
        .search_users(
            &state.users,
            auth.user_id,
            &params.q,
            state.settings.search_limit,
        )
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "users": users })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(search);
}
