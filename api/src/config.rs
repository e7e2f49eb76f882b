use std::env;
use std::time::Duration;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::app::ScoringConfig;

/// Owner of every row when no user id is configured
pub const DEFAULT_USER_ID: &str = "0b3c6a14-8d1e-4ca4-b44f-8b89980bc61b";

const DEFAULT_AUTO_ASSESS_INTERVAL_SECS: u64 = 3600;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// The single user this deployment ranks
    pub user_id: Uuid,
    pub port: u16,
    /// How often to check for an unassessed week, `None` when disabled
    pub auto_assess_interval: Option<Duration>,
    /// Year applied to daily log dates written without one
    pub import_default_year: i32,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            user_id: parse_user_id(env::var("NOCTISIUM_USER_ID").ok()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            auto_assess_interval: parse_interval(env::var("AUTO_ASSESS_INTERVAL_SECS").ok()),
            import_default_year: env::var("IMPORT_DEFAULT_YEAR")
                .ok()
                .and_then(|y| y.parse().ok())
                .unwrap_or_else(|| Utc::now().year()),
            scoring: ScoringConfig::from_env(),
        }
    }
}

fn default_user_id() -> Uuid {
    Uuid::parse_str(DEFAULT_USER_ID).unwrap_or_default()
}

fn parse_user_id(raw: Option<String>) -> Uuid {
    match raw {
        Some(raw) => Uuid::parse_str(raw.trim()).unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "Ignoring invalid NOCTISIUM_USER_ID");
            default_user_id()
        }),
        None => default_user_id(),
    }
}

fn parse_interval(raw: Option<String>) -> Option<Duration> {
    let secs = raw
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_AUTO_ASSESS_INTERVAL_SECS);
    (secs > 0).then(|| Duration::from_secs(secs))
}
