//! Runtime configuration for the ladder server.

use once_cell::sync::Lazy;
use std::{env, path::PathBuf, str::FromStr};

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    /// Lifetime of a login session (seconds).
    pub session_ttl: u64,
    /// Elo K-factor applied to every rated result.
    pub k_factor: f64,
    /// Rating assigned at registration.
    pub initial_elo: i32,
    /// Elo distance two queued players may have at zero wait.
    pub elo_window_base: i32,
    /// Points the window widens per second of the longer wait.
    pub elo_window_growth: i32,
    /// Seconds a queue entry survives without being paired.
    pub queue_timeout: u64,
    /// Seconds an unreported pairing stays open.
    pub match_ttl: u64,
    /// Upper bound on leaderboard staleness (seconds).
    pub leaderboard_cache_ttl: u64,
    pub leaderboard_max: usize,
    pub search_limit: usize,
    pub recommendation_limit: usize,
    pub history_limit: usize,
    pub min_password_len: usize,
    /// Period of the background sweeper (seconds).
    pub sweep_interval: u64,
    /// Directory holding `state.json`; persistence is off when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server_addr: "127.0.0.1:3000".into(),
            session_ttl: 86_400,
            k_factor: 16.0,
            initial_elo: 1600,
            elo_window_base: 200,
            elo_window_growth: 10,
            queue_timeout: 300,
            match_ttl: 3_600,
            leaderboard_cache_ttl: 5,
            leaderboard_max: 100,
            search_limit: 20,
            recommendation_limit: 10,
            history_limit: 100,
            min_password_len: 8,
            sweep_interval: 5,
            data_dir: None,
        }
    }
}

/// Ceiling for every lifetime setting (ten years).
pub const MAX_TTL_SECS: u64 = 10 * 365 * 86_400;

/// Seconds as a chrono duration, clamped to [`MAX_TTL_SECS`].
pub fn ttl(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Self {
        let d = Settings::default();
        Settings {
            server_addr: env::var("SERVER_ADDR").unwrap_or(d.server_addr),
            session_ttl: env_or("SESSION_TTL", d.session_ttl).min(MAX_TTL_SECS),
            k_factor: env_or("K_FACTOR", d.k_factor),
            initial_elo: env_or("INITIAL_ELO", d.initial_elo),
            elo_window_base: env_or("ELO_WINDOW_BASE", d.elo_window_base),
            elo_window_growth: env_or("ELO_WINDOW_GROWTH", d.elo_window_growth),
            queue_timeout: env_or("QUEUE_TIMEOUT", d.queue_timeout).min(MAX_TTL_SECS),
            match_ttl: env_or("MATCH_TTL", d.match_ttl).min(MAX_TTL_SECS),
            leaderboard_cache_ttl: env_or("LEADERBOARD_CACHE_TTL", d.leaderboard_cache_ttl)
                .min(MAX_TTL_SECS),
            leaderboard_max: env_or("LEADERBOARD_MAX", d.leaderboard_max),
            search_limit: env_or("SEARCH_LIMIT", d.search_limit),
            recommendation_limit: env_or("RECOMMENDATION_LIMIT", d.recommendation_limit),
            history_limit: env_or("HISTORY_LIMIT", d.history_limit),
            min_password_len: env_or("MIN_PASSWORD_LEN", d.min_password_len),
            sweep_interval: env_or("SWEEP_INTERVAL", d.sweep_interval).max(1),
            data_dir: env::var("DATA_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_values_fall_back_to_default() {
        env::set_var("LADDER_TEST_BAD_NUMBER", "sixteen");
        assert_eq!(env_or("LADDER_TEST_BAD_NUMBER", 16_u32), 16);

        env::set_var("LADDER_TEST_GOOD_NUMBER", " 24 ");
        assert_eq!(env_or("LADDER_TEST_GOOD_NUMBER", 16_u32), 24);
    }

    #[test]
    fn huge_lifetimes_are_clamped() {
        assert_eq!(ttl(u64::MAX).num_seconds(), MAX_TTL_SECS as i64);
        assert_eq!(ttl(90).num_seconds(), 90);
    }

    #[test]
    fn defaults_match_the_published_constants() {
        let s = Settings::default();
        assert_eq!(s.initial_elo, 1600);
        assert_eq!(s.k_factor, 16.0);
        assert!(s.data_dir.is_none());
    }
}
