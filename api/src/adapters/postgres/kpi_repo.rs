//! PostgreSQL adapter for KpiRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::entities::KpiDefinition;
use crate::domain::ports::KpiRepository;
use crate::entity::kpi_definitions;
use crate::error::DomainError;

/// PostgreSQL implementation of KpiRepository
pub struct PostgresKpiRepository {
    db: DatabaseConnection,
    user_id: Uuid,
}

impl PostgresKpiRepository {
    pub fn new(db: DatabaseConnection, user_id: Uuid) -> Self {
        Self { db, user_id }
    }
}

#[async_trait]
impl KpiRepository for PostgresKpiRepository {
    async fn list(&self) -> Result<Vec<KpiDefinition>, DomainError> {
        let results = kpi_definitions::Entity::find()
            .filter(kpi_definitions::Column::UserId.eq(self.user_id))
            .order_by_asc(kpi_definitions::Column::KpiId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_active(&self) -> Result<Vec<KpiDefinition>, DomainError> {
        let results = kpi_definitions::Entity::find()
            .filter(kpi_definitions::Column::UserId.eq(self.user_id))
            .filter(kpi_definitions::Column::IsActive.eq(true))
            .order_by_asc(kpi_definitions::Column::KpiId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn upsert(&self, kpi: &KpiDefinition) -> Result<KpiDefinition, DomainError> {
        let model = kpi_definitions::ActiveModel {
            user_id: Set(self.user_id),
            kpi_id: Set(kpi.id.clone()),
            name: Set(kpi.name.clone()),
            target: Set(kpi.target),
            weight: Set(kpi.weight),
            unit: Set(kpi.unit.clone()),
            is_active: Set(kpi.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        kpi_definitions::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    kpi_definitions::Column::UserId,
                    kpi_definitions::Column::KpiId,
                ])
                .update_columns([
                    kpi_definitions::Column::Name,
                    kpi_definitions::Column::Target,
                    kpi_definitions::Column::Weight,
                    kpi_definitions::Column::Unit,
                    kpi_definitions::Column::IsActive,
                    kpi_definitions::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(kpi.clone())
    }
}

/// Convert SeaORM model to domain entity
impl From<kpi_definitions::Model> for KpiDefinition {
    fn from(model: kpi_definitions::Model) -> Self {
        KpiDefinition {
            id: model.kpi_id,
            name: model.name,
            target: model.target,
            weight: model.weight,
            unit: model.unit,
            is_active: model.is_active,
        }
    }
}
