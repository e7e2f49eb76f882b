//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.
//! Each repository is bound to one user id and never touches other users' rows.

pub mod daily_metrics_repo;
pub mod kpi_repo;
pub mod rank_change_repo;
pub mod user_rank_repo;
pub mod weekly_kpi_repo;


pub use daily_metrics_repo::PostgresDailyMetricsRepository;
pub use kpi_repo::PostgresKpiRepository;
pub use rank_change_repo::PostgresRankChangeRepository;
pub use user_rank_repo::PostgresUserRankRepository;
pub use weekly_kpi_repo::PostgresWeeklyKpiRepository;

use crate::domain::entities::WeekKey;
use crate::error::DomainError;

/// Parse a stored week key
pub(crate) fn parse_week_key(raw: &str) -> Result<WeekKey, DomainError> {
    raw.parse()
        .map_err(|e| DomainError::Internal(format!("Corrupt week key {:?}: {}", raw, e)))
}
