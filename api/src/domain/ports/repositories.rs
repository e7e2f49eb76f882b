//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//! Every repository is scoped to the single configured user.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{
    DailyMetrics, KpiDefinition, RankChange, UserRank, WeekKey, WeeklyKpiRecord,
};
use crate::error::DomainError;

/// Repository for KPI definitions
#[async_trait]
pub trait KpiRepository: Send + Sync {
    /// List all definitions, active or not
    async fn list(&self) -> Result<Vec<KpiDefinition>, DomainError>;

    /// List definitions with `is_active` set
    async fn find_active(&self) -> Result<Vec<KpiDefinition>, DomainError>;

    /// Create or replace a definition by id
    async fn upsert(&self, kpi: &KpiDefinition) -> Result<KpiDefinition, DomainError>;
}

/// Repository for weekly KPI records
#[async_trait]
pub trait WeeklyKpiRepository: Send + Sync {
    /// Find the record for a week
    async fn find_by_week(&self, week_key: &WeekKey)
        -> Result<Option<WeeklyKpiRecord>, DomainError>;

    /// List every stored week, in no particular order
    async fn list_all(&self) -> Result<Vec<WeeklyKpiRecord>, DomainError>;

    /// Create or replace the record for `record.week_key`
    async fn upsert(&self, record: &WeeklyKpiRecord) -> Result<(), DomainError>;
}

/// Read side of the current rank snapshot
///
/// The snapshot is only written together with the history, through
/// `RankChangeRepository`.
#[async_trait]
pub trait UserRankRepository: Send + Sync {
    async fn get(&self) -> Result<Option<UserRank>, DomainError>;
}

/// Repository for rank change history and the snapshot derived from it
#[async_trait]
pub trait RankChangeRepository: Send + Sync {
    /// All records, newest week first
    async fn list(&self) -> Result<Vec<RankChange>, DomainError>;

    async fn find_by_week(&self, week_key: &WeekKey) -> Result<Option<RankChange>, DomainError>;

    /// Upsert records by week and save the user rank in one transaction.
    /// Either everything is written or nothing is.
    async fn record_assessment(
        &self,
        changes: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError>;

    /// Replace the whole history and save the user rank in one transaction
    async fn replace_all(&self, history: &[RankChange], rank: &UserRank)
        -> Result<(), DomainError>;
}

/// Repository for imported daily metrics
#[async_trait]
pub trait DailyMetricsRepository: Send + Sync {
    /// Insert or replace rows keyed by date
    async fn upsert_many(&self, days: &[DailyMetrics]) -> Result<(), DomainError>;

    /// Rows with `start <= date <= end`, ascending by date
    async fn find_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, DomainError>;
}
