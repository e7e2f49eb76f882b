//! Rank history
//!
//! Stored rank changes are a memoized view over the weekly KPI records and
//! the scoring curve. Regeneration throws the stored view away and replays
//! every week with data, oldest first, from 0 RR.

use serde::Serialize;

use crate::app::rank_config::ScoringConfig;
use crate::app::ranking_service::RankingService;
use crate::app::scoring::score_week;
use crate::domain::entities::{
    sort_newest_first, KpiDefinition, RankChange, UserRank, WeeklyKpiRecord,
};
use crate::domain::ports::{
    Clock, KpiRepository, RankChangeRepository, UserRankRepository, WeeklyKpiRepository,
};
use crate::error::AppError;

/// Result of a full history regeneration
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRegeneration {
    pub weeks_replayed: usize,
    pub user_rank: UserRank,
    /// Regenerated records, newest first
    pub history: Vec<RankChange>,
}

/// Replay weekly records into a rank change chain.
///
/// Weeks without data are skipped. The rest are sorted by week before
/// scoring because RR is cumulative: each week starts from the previous
/// week's result. Returned oldest first.
pub fn replay_history(
    records: &[WeeklyKpiRecord],
    kpis: &[KpiDefinition],
    config: &ScoringConfig,
) -> Vec<RankChange> {
    let mut weeks: Vec<&WeeklyKpiRecord> = records.iter().filter(|r| r.has_data()).collect();
    weeks.sort_by_key(|r| r.week_key);
    weeks.dedup_by_key(|r| r.week_key);

    let mut rr = 0;
    weeks
        .into_iter()
        .map(|record| {
            let (change, _) = score_week(record, kpis, rr, config);
            rr = change.new_rr;
            change
        })
        .collect()
}

impl<K, W, U, R, C> RankingService<K, W, U, R, C>
where
    K: KpiRepository,
    W: WeeklyKpiRepository,
    U: UserRankRepository,
    R: RankChangeRepository,
    C: Clock,
{
    /// Stored rank changes, newest first
    pub async fn get_rank_history(&self) -> Result<Vec<RankChange>, AppError> {
        let mut history = self.rank_changes.list().await?;
        sort_newest_first(&mut history);
        Ok(history)
    }

    /// Rebuild the whole history from weekly KPI data.
    ///
    /// Replaces the stored history atomically and re-derives the user rank.
    pub async fn regenerate_rank_history(&self) -> Result<HistoryRegeneration, AppError> {
        let _guard = self.write_lock.lock().await;

        let records = self.weeks.list_all().await?;
        let kpis = self.kpis.find_active().await?;

        let replayed = replay_history(&records, &kpis, &self.config);
        let user_rank = UserRank::from_history(&replayed, self.config.week_completed_percent)
            .unwrap_or_default();
        self.rank_changes.replace_all(&replayed, &user_rank).await?;

        tracing::info!(
            weeks = replayed.len(),
            rr_points = user_rank.rr_points,
            rank = %user_rank.current_rank,
            "Rank history regenerated"
        );

        let mut history = replayed;
        sort_newest_first(&mut history);

        Ok(HistoryRegeneration {
            weeks_replayed: history.len(),
            user_rank,
            history,
        })
    }
}
