//! Username/password authentication with opaque bearer sessions.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, state::AppState};

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: u64,
    pub expires_in: i64,
}

//////////////////////////////////////////////////
// ─────────────  AuthUser extractor  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
    use futures_util::future::{ready, Ready};

    use crate::{error::CoreError, state::AppState};

    /// Validated session behind the request's bearer token.
    #[derive(Debug, Clone)]
    pub struct AuthUser {
        pub user_id: u64,
        pub token: String,
    }

    /// Accepts `Authorization: Bearer <token>` (scheme in any case) as well as a
    /// bare token.
    pub fn bearer_token(req: &HttpRequest) -> Result<String, CoreError> {
        let hdr = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(CoreError::MissingToken)?;
        let token = match hdr.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            _ => hdr,
        };
        if token.is_empty() {
            return Err(CoreError::MissingToken);
        }
        Ok(token.to_string())
    }

    impl FromRequest for AuthUser {
        type Error = CoreError;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = (|| -> Result<Self, CoreError> {
                let state = req
                    .app_data::<web::Data<AppState>>()
                    .ok_or_else(|| CoreError::Internal("app state not configured".into()))?;
                let token = bearer_token(req)?;
                let user_id = state.auth.validate(&token)?;
                Ok(AuthUser { user_id, token })
            })();

            ready(res)
        }
    }
}
pub use extractor::AuthUser;

//////////////////////////////////////////////////
// POST /auth/register
//////////////////////////////////////////////////
#[post("/auth/register")]
pub async fn register(
    info: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    let user = state
        .auth
        .register(&state.users, &info.username, &info.password)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "user_id": user.id,
    })))
}

//////////////////////////////////////////////////
// POST /auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    info: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    let session = state
        .auth
        .login(&state.users, &info.username, &info.password)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        expires_in: (session.expires_at - session.issued_at).num_seconds(),
        token: session.token,
        user_id: session.user_id,
    }))
}

//////////////////////////////////////////////////
// POST /auth/logout
//////////////////////////////////////////////////
#[post("/auth/logout")]
pub async fn logout(
    req: actix_web::HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CoreError> {
    // unknown or expired tokens still log out cleanly
    let token = extractor::bearer_token(&req)?;
    state.auth.logout(&token);
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(logout);
}
