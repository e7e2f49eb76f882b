//! SeaORM table models
//!
//! Every table is keyed by the owning user id; see `migrations/001_initial.sql`.

pub mod daily_metrics;
pub mod kpi_definitions;
pub mod rank_changes;
pub mod user_ranks;
pub mod weekly_kpis;
