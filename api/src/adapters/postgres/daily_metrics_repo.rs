//! PostgreSQL adapter for DailyMetricsRepository
//!
//! Metrics are stored as one JSONB document per day, in the same camelCase
//! shape the dashboard reads.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::entities::DailyMetrics;
use crate::domain::ports::DailyMetricsRepository;
use crate::entity::daily_metrics;
use crate::error::DomainError;

/// PostgreSQL implementation of DailyMetricsRepository
pub struct PostgresDailyMetricsRepository {
    db: DatabaseConnection,
    user_id: Uuid,
}

impl PostgresDailyMetricsRepository {
    pub fn new(db: DatabaseConnection, user_id: Uuid) -> Self {
        Self { db, user_id }
    }
}

#[async_trait]
impl DailyMetricsRepository for PostgresDailyMetricsRepository {
    async fn upsert_many(&self, days: &[DailyMetrics]) -> Result<(), DomainError> {
        if days.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models = days
            .iter()
            .map(|day| {
                let data = serde_json::to_value(day)
                    .map_err(|e| DomainError::Internal(e.to_string()))?;
                Ok(daily_metrics::ActiveModel {
                    user_id: Set(self.user_id),
                    date: Set(day.date),
                    data: Set(data),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        daily_metrics::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([daily_metrics::Column::UserId, daily_metrics::Column::Date])
                    .update_columns([daily_metrics::Column::Data, daily_metrics::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, DomainError> {
        let results = daily_metrics::Entity::find()
            .filter(daily_metrics::Column::UserId.eq(self.user_id))
            .filter(daily_metrics::Column::Date.gte(start))
            .filter(daily_metrics::Column::Date.lte(end))
            .order_by_asc(daily_metrics::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(DailyMetrics::try_from).collect()
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<daily_metrics::Model> for DailyMetrics {
    type Error = DomainError;

    fn try_from(model: daily_metrics::Model) -> Result<Self, Self::Error> {
        let mut day: DailyMetrics = serde_json::from_value(model.data)
            .map_err(|e| DomainError::Internal(format!("Corrupt daily metrics: {}", e)))?;
        day.date = model.date;
        Ok(day)
    }
}
