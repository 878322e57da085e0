//! Domain error type shared by every component and mapped onto HTTP.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("username already taken")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("missing Authorization header")]
    MissingToken,

    #[error("invalid session token")]
    InvalidToken,

    #[error("session expired")]
    Expired,

    #[error("unknown user {0}")]
    UnknownUser(u64),

    #[error("already queued")]
    AlreadyQueued,

    #[error("already in an unreported match")]
    InMatch,

    #[error("not queued")]
    NotQueued,

    #[error("no open match against that opponent")]
    NotPaired,

    #[error("result already recorded for match {0}")]
    AlreadyRecorded(u64),

    #[error("cannot befriend yourself")]
    SelfFriend,

    #[error("friend request already pending")]
    AlreadyPending,

    #[error("already friends")]
    AlreadyFriends,

    #[error("no such friend request")]
    NoSuchRequest,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InvalidInput(_) | CoreError::SelfFriend => StatusCode::BAD_REQUEST,
            CoreError::InvalidCredentials
            | CoreError::MissingToken
            | CoreError::InvalidToken
            | CoreError::Expired => StatusCode::UNAUTHORIZED,
            CoreError::UnknownUser(_) | CoreError::NoSuchRequest => StatusCode::NOT_FOUND,
            CoreError::DuplicateUsername
            | CoreError::AlreadyQueued
            | CoreError::InMatch
            | CoreError::NotQueued
            | CoreError::NotPaired
            | CoreError::AlreadyRecorded(_)
            | CoreError::AlreadyPending
            | CoreError::AlreadyFriends => StatusCode::CONFLICT,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            CoreError::Internal(msg) => {
                log::error!("internal error: {msg}");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}
