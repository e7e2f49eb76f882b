//! PostgreSQL adapter for RankChangeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use super::parse_week_key;
use super::user_rank_repo::save_rank;
use crate::domain::entities::{sort_newest_first, RankChange, RankTier, UserRank, WeekKey};
use crate::domain::ports::RankChangeRepository;
use crate::entity::rank_changes;
use crate::error::DomainError;

/// PostgreSQL implementation of RankChangeRepository
pub struct PostgresRankChangeRepository {
    db: DatabaseConnection,
    user_id: Uuid,
}

impl PostgresRankChangeRepository {
    pub fn new(db: DatabaseConnection, user_id: Uuid) -> Self {
        Self { db, user_id }
    }

    fn to_active_model(&self, change: &RankChange) -> rank_changes::ActiveModel {
        rank_changes::ActiveModel {
            user_id: Set(self.user_id),
            week_key: Set(change.week_key.to_string()),
            old_rank: Set(change.old_rank.to_string()),
            new_rank: Set(change.new_rank.to_string()),
            old_rr: Set(change.old_rr),
            new_rr: Set(change.new_rr),
            rr_change: Set(change.rr_change),
            completion_percentage: Set(change.completion_percentage),
            created_at: Set(change.timestamp.fixed_offset()),
        }
    }
}

#[async_trait]
impl RankChangeRepository for PostgresRankChangeRepository {
    async fn list(&self) -> Result<Vec<RankChange>, DomainError> {
        let results = rank_changes::Entity::find()
            .filter(rank_changes::Column::UserId.eq(self.user_id))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut changes = results
            .into_iter()
            .map(RankChange::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut changes);
        Ok(changes)
    }

    async fn find_by_week(&self, week_key: &WeekKey) -> Result<Option<RankChange>, DomainError> {
        let result = rank_changes::Entity::find_by_id((self.user_id, week_key.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(RankChange::try_from).transpose()
    }

    async fn record_assessment(
        &self,
        changes: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if !changes.is_empty() {
            let models: Vec<_> = changes.iter().map(|c| self.to_active_model(c)).collect();
            rank_changes::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::columns([
                        rank_changes::Column::UserId,
                        rank_changes::Column::WeekKey,
                    ])
                    .update_columns([
                        rank_changes::Column::OldRank,
                        rank_changes::Column::NewRank,
                        rank_changes::Column::OldRr,
                        rank_changes::Column::NewRr,
                        rank_changes::Column::RrChange,
                        rank_changes::Column::CompletionPercentage,
                        rank_changes::Column::CreatedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        save_rank(&txn, self.user_id, rank).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn replace_all(
        &self,
        history: &[RankChange],
        rank: &UserRank,
    ) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        rank_changes::Entity::delete_many()
            .filter(rank_changes::Column::UserId.eq(self.user_id))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if !history.is_empty() {
            let models: Vec<_> = history.iter().map(|c| self.to_active_model(c)).collect();
            rank_changes::Entity::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        save_rank(&txn, self.user_id, rank).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<rank_changes::Model> for RankChange {
    type Error = DomainError;

    fn try_from(model: rank_changes::Model) -> Result<Self, Self::Error> {
        Ok(RankChange {
            week_key: parse_week_key(&model.week_key)?,
            old_rank: model
                .old_rank
                .parse()
                .unwrap_or_else(|_| RankTier::from_rr(model.old_rr)),
            new_rank: model
                .new_rank
                .parse()
                .unwrap_or_else(|_| RankTier::from_rr(model.new_rr)),
            old_rr: model.old_rr,
            new_rr: model.new_rr,
            rr_change: model.rr_change,
            completion_percentage: model.completion_percentage,
            timestamp: model.created_at.with_timezone(&Utc),
        })
    }
}
