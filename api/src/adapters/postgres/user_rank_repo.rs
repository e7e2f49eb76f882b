//! PostgreSQL adapter for UserRankRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::domain::entities::{RankTier, UserRank};
use crate::domain::ports::UserRankRepository;
use crate::entity::user_ranks;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRankRepository
pub struct PostgresUserRankRepository {
    db: DatabaseConnection,
    user_id: Uuid,
}

impl PostgresUserRankRepository {
    pub fn new(db: DatabaseConnection, user_id: Uuid) -> Self {
        Self { db, user_id }
    }
}

#[async_trait]
impl UserRankRepository for PostgresUserRankRepository {
    async fn get(&self) -> Result<Option<UserRank>, DomainError> {
        let result = user_ranks::Entity::find_by_id(self.user_id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

/// Upsert the rank row on `conn`, which is usually an open transaction
pub(super) async fn save_rank<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    rank: &UserRank,
) -> Result<(), DomainError> {
    let model = user_ranks::ActiveModel {
        user_id: Set(user_id),
        current_rank: Set(rank.current_rank.to_string()),
        rr_points: Set(rank.rr_points),
        weeks_completed: Set(rank.weeks_completed),
        total_weeks: Set(rank.total_weeks),
        updated_at: Set(Utc::now().fixed_offset()),
    };

    user_ranks::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user_ranks::Column::UserId)
                .update_columns([
                    user_ranks::Column::CurrentRank,
                    user_ranks::Column::RrPoints,
                    user_ranks::Column::WeeksCompleted,
                    user_ranks::Column::TotalWeeks,
                    user_ranks::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}

/// Convert SeaORM model to domain entity
impl From<user_ranks::Model> for UserRank {
    fn from(model: user_ranks::Model) -> Self {
        UserRank {
            current_rank: model
                .current_rank
                .parse()
                .unwrap_or_else(|_| RankTier::from_rr(model.rr_points)),
            rr_points: model.rr_points,
            weeks_completed: model.weeks_completed,
            total_weeks: model.total_weeks,
        }
    }
}
