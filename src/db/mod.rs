pub mod elo_repo;
pub mod models;
pub mod snapshot;
pub mod user_repo;
