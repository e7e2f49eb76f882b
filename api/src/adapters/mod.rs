//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod clock;
pub mod postgres;

pub use clock::SystemClock;
pub use postgres::{
    PostgresDailyMetricsRepository, PostgresKpiRepository, PostgresRankChangeRepository,
    PostgresUserRankRepository, PostgresWeeklyKpiRepository,
};
