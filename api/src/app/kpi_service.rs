//! KPI service
//!
//! Manages KPI definitions and the weekly value records scoring reads.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{validate_values, KpiDefinition, WeekKey, WeeklyKpiRecord};
use crate::domain::ports::{KpiRepository, WeeklyKpiRepository};
use crate::error::{AppError, DomainError};

/// Service for KPI definitions and weekly records
pub struct KpiService<K, W>
where
    K: KpiRepository,
    W: WeeklyKpiRepository,
{
    kpis: Arc<K>,
    weeks: Arc<W>,
}

impl<K, W> KpiService<K, W>
where
    K: KpiRepository,
    W: WeeklyKpiRepository,
{
    pub fn new(kpis: Arc<K>, weeks: Arc<W>) -> Self {
        Self { kpis, weeks }
    }

    /// All definitions, active or not, ordered by id
    pub async fn list_kpis(&self) -> Result<Vec<KpiDefinition>, AppError> {
        let mut kpis = self.kpis.list().await?;
        kpis.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(kpis)
    }

    /// Create or replace a definition
    pub async fn upsert_kpi(&self, kpi: KpiDefinition) -> Result<KpiDefinition, AppError> {
        kpi.validate().map_err(DomainError::Validation)?;

        let saved = self.kpis.upsert(&kpi).await?;
        tracing::info!(
            kpi_id = %saved.id,
            target = saved.target,
            weight = saved.weight,
            active = saved.is_active,
            "KPI definition saved"
        );
        Ok(saved)
    }

    /// Weekly record, empty when nothing was logged
    pub async fn get_week(&self, week_key: WeekKey) -> Result<WeeklyKpiRecord, AppError> {
        Ok(self
            .weeks
            .find_by_week(&week_key)
            .await?
            .unwrap_or_else(|| WeeklyKpiRecord::empty(week_key)))
    }

    /// Replace the value map of a week
    pub async fn put_week(
        &self,
        week_key: WeekKey,
        values: BTreeMap<String, f64>,
    ) -> Result<WeeklyKpiRecord, AppError> {
        validate_values(&values).map_err(DomainError::Validation)?;

        let record = WeeklyKpiRecord { week_key, values };
        self.weeks.upsert(&record).await?;
        tracing::info!(week_key = %week_key, kpis = record.values.len(), "Weekly values saved");
        Ok(record)
    }
}
