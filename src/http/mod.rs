pub mod auth;
pub mod friends;
pub mod games;
pub mod health;
pub mod leaderboard;
pub mod matchmaking;
pub mod presence;
pub mod routes;
pub mod user;
pub mod users;
