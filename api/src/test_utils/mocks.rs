//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{DailyMetrics, KpiDefinition, RankChange, UserRank, WeekKey, WeeklyKpiRecord};
use crate::domain::ports::{
    Clock, DailyMetricsRepository, KpiRepository, RankChangeRepository, UserRankRepository,
    WeeklyKpiRepository,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory KPI Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryKpiRepository {
    kpis: Arc<RwLock<BTreeMap<String, KpiDefinition>>>,
}

impl InMemoryKpiRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a KPI for testing
    pub fn with_kpi(self, kpi: KpiDefinition) -> Self {
        self.kpis.write().unwrap().insert(kpi.id.clone(), kpi);
        self
    }
}

#[async_trait]
impl KpiRepository for InMemoryKpiRepository {
    async fn list(&self) -> Result<Vec<KpiDefinition>, DomainError> {
        Ok(self.kpis.read().unwrap().values().cloned().collect())
    }

    async fn find_active(&self) -> Result<Vec<KpiDefinition>, DomainError> {
        Ok(self
            .kpis
            .read()
            .unwrap()
            .values()
            .filter(|k| k.is_active)
            .cloned()
            .collect())
    }

    async fn upsert(&self, kpi: &KpiDefinition) -> Result<KpiDefinition, DomainError> {
        self.kpis
            .write()
            .unwrap()
            .insert(kpi.id.clone(), kpi.clone());
        Ok(kpi.clone())
    }
}

// ============================================================================
// In-Memory Weekly KPI Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryWeeklyKpiRepository {
    records: Arc<RwLock<HashMap<WeekKey, WeeklyKpiRecord>>>,
}

impl InMemoryWeeklyKpiRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a weekly record for testing
    pub fn with_record(self, record: WeeklyKpiRecord) -> Self {
        self.records
            .write()
            .unwrap()
            .insert(record.week_key, record);
        self
    }
}

#[async_trait]
impl WeeklyKpiRepository for InMemoryWeeklyKpiRepository {
    async fn find_by_week(
        &self,
        week_key: &WeekKey,
    ) -> Result<Option<WeeklyKpiRecord>, DomainError> {
        Ok(self.records.read().unwrap().get(week_key).cloned())
    }

    async fn list_all(&self) -> Result<Vec<WeeklyKpiRecord>, DomainError> {
        Ok(self.records.read().unwrap().values().cloned().collect())
    }

    async fn upsert(&self, record: &WeeklyKpiRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .unwrap()
            .insert(record.week_key, record.clone());
        Ok(())
    }
}

// ============================================================================
// In-Memory User Rank Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRankRepository {
    rank: Arc<RwLock<Option<UserRank>>>,
}

impl InMemoryUserRankRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a rank snapshot for testing
    pub fn with_rank(self, rank: UserRank) -> Self {
        *self.rank.write().unwrap() = Some(rank);
        self
    }
}

#[async_trait]
impl UserRankRepository for InMemoryUserRankRepository {
    async fn get(&self) -> Result<Option<UserRank>, DomainError> {
        Ok(self.rank.read().unwrap().clone())
    }
}

// ============================================================================
// In-Memory Rank Change Repository
// ============================================================================

/// Where a simulated database failure strikes
#[derive(Debug, Clone, Copy, Default)]
enum WriteFailure {
    #[default]
    Never,
    /// Before anything is written
    Always,
    /// After the history is staged, when the rank row is written
    OnRank,
    /// When the batch touches this week
    OnWeek(WeekKey),
}

/// Writes stage a copy of the history and swap it in together with the rank,
/// so a failed write leaves both untouched, like a rolled back transaction.
#[derive(Default)]
pub struct InMemoryRankChangeRepository {
    changes: Arc<RwLock<BTreeMap<WeekKey, RankChange>>>,
    rank: Arc<RwLock<Option<UserRank>>>,
    failure: WriteFailure,
}

impl InMemoryRankChangeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share the rank snapshot with `user_ranks`, so committed writes show up there
    pub fn linked_to(mut self, user_ranks: &InMemoryUserRankRepository) -> Self {
        self.rank = user_ranks.rank.clone();
        self
    }

    /// Pre-populate with a rank change for testing
    pub fn with_change(self, change: RankChange) -> Self {
        self.changes
            .write()
            .unwrap()
            .insert(change.week_key, change);
        self
    }

    /// Make every write fail with a database error
    pub fn failing_writes(mut self) -> Self {
        self.failure = WriteFailure::Always;
        self
    }

    /// Fail when the rank row is written, after the history is staged
    pub fn failing_rank_writes(mut self) -> Self {
        self.failure = WriteFailure::OnRank;
        self
    }

    /// Fail any write whose batch includes `week_key`
    pub fn failing_on_week(mut self, week_key: WeekKey) -> Self {
        self.failure = WriteFailure::OnWeek(week_key);
        self
    }

    fn commit(
        &self,
        staged: BTreeMap<WeekKey, RankChange>,
        batch: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError> {
        let failed = match self.failure {
            WriteFailure::Never => false,
            WriteFailure::Always | WriteFailure::OnRank => true,
            WriteFailure::OnWeek(week_key) => batch.iter().any(|c| c.week_key == week_key),
        };
        if failed {
            return Err(DomainError::Database("connection refused".to_string()));
        }

        *self.changes.write().unwrap() = staged;
        *self.rank.write().unwrap() = Some(rank.clone());
        Ok(())
    }
}

#[async_trait]
impl RankChangeRepository for InMemoryRankChangeRepository {
    async fn list(&self) -> Result<Vec<RankChange>, DomainError> {
        Ok(self
            .changes
            .read()
            .unwrap()
            .values()
            .rev()
            .cloned()
            .collect())
    }

    async fn find_by_week(&self, week_key: &WeekKey) -> Result<Option<RankChange>, DomainError> {
        Ok(self.changes.read().unwrap().get(week_key).cloned())
    }

    async fn record_assessment(
        &self,
        changes: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError> {
        let mut staged = self.changes.read().unwrap().clone();
        for change in changes {
            staged.insert(change.week_key, change.clone());
        }
        self.commit(staged, changes, rank)
    }

    async fn replace_all(
        &self,
        history: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError> {
        let staged = history
            .iter()
            .map(|c| (c.week_key, c.clone()))
            .collect();
        self.commit(staged, history, rank)
    }
}

// ============================================================================
// In-Memory Daily Metrics Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryDailyMetricsRepository {
    days: Arc<RwLock<BTreeMap<NaiveDate, DailyMetrics>>>,
}

impl InMemoryDailyMetricsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored days
    pub fn len(&self) -> usize {
        self.days.read().unwrap().len()
    }
}

#[async_trait]
impl DailyMetricsRepository for InMemoryDailyMetricsRepository {
    async fn upsert_many(&self, days: &[DailyMetrics]) -> Result<(), DomainError> {
        let mut stored = self.days.write().unwrap();
        for day in days {
            stored.insert(day.date, day.clone());
        }
        Ok(())
    }

    async fn find_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, DomainError> {
        Ok(self
            .days
            .read()
            .unwrap()
            .range(start..=end)
            .map(|(_, day)| day.clone())
            .collect())
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

/// Clock pinned to one day
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self::new(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
