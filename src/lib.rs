pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod leaderboard;
pub mod matchmaking;
pub mod metrics;
pub mod rating;
pub mod social;
pub mod state;
