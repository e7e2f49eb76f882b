//! PostgreSQL adapter for WeeklyKpiRepository

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::parse_week_key;
use crate::domain::entities::{WeekKey, WeeklyKpiRecord};
use crate::domain::ports::WeeklyKpiRepository;
use crate::entity::weekly_kpis;
use crate::error::DomainError;

/// PostgreSQL implementation of WeeklyKpiRepository
pub struct PostgresWeeklyKpiRepository {
    db: DatabaseConnection,
    user_id: Uuid,
}

impl PostgresWeeklyKpiRepository {
    pub fn new(db: DatabaseConnection, user_id: Uuid) -> Self {
        Self { db, user_id }
    }
}

#[async_trait]
impl WeeklyKpiRepository for PostgresWeeklyKpiRepository {
    async fn find_by_week(
        &self,
        week_key: &WeekKey,
    ) -> Result<Option<WeeklyKpiRecord>, DomainError> {
        let result = weekly_kpis::Entity::find_by_id((self.user_id, week_key.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(WeeklyKpiRecord::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<WeeklyKpiRecord>, DomainError> {
        let results = weekly_kpis::Entity::find()
            .filter(weekly_kpis::Column::UserId.eq(self.user_id))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(WeeklyKpiRecord::try_from).collect()
    }

    async fn upsert(&self, record: &WeeklyKpiRecord) -> Result<(), DomainError> {
        let values = serde_json::to_value(&record.values)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let model = weekly_kpis::ActiveModel {
            user_id: Set(self.user_id),
            week_key: Set(record.week_key.to_string()),
            kpi_values: Set(values),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        weekly_kpis::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([weekly_kpis::Column::UserId, weekly_kpis::Column::WeekKey])
                    .update_columns([weekly_kpis::Column::KpiValues, weekly_kpis::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<weekly_kpis::Model> for WeeklyKpiRecord {
    type Error = DomainError;

    fn try_from(model: weekly_kpis::Model) -> Result<Self, Self::Error> {
        let values: BTreeMap<String, f64> = serde_json::from_value(model.kpi_values)
            .map_err(|e| DomainError::Internal(format!("Corrupt KPI values: {}", e)))?;

        Ok(WeeklyKpiRecord {
            week_key: parse_week_key(&model.week_key)?,
            values,
        })
    }
}
