//! Ranking service
//!
//! Owns every write to the rank ladder. Assessing a week scores it, re-chains
//! any later weeks and re-derives the user rank, then commits all of it in a
//! single repository call. Writes go through one lock so history regeneration
//! never interleaves with an assessment.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::rank_config::ScoringConfig;
use crate::app::scoring::{calculate_week_completion, kpi_breakdown, score_week};
use crate::domain::entities::{
    sort_oldest_first, RankChange, UserRank, WeekKey, WeekProgress, WeeklyAssessment,
    WeeklyKpiRecord,
};
use crate::domain::ports::{
    Clock, KpiRepository, RankChangeRepository, UserRankRepository, WeeklyKpiRepository,
};
use crate::error::AppError;

/// Service for weekly rank assessment
pub struct RankingService<K, W, U, R, C>
where
    K: KpiRepository,
    W: WeeklyKpiRepository,
    U: UserRankRepository,
    R: RankChangeRepository,
    C: Clock,
{
    pub(crate) kpis: Arc<K>,
    pub(crate) weeks: Arc<W>,
    pub(crate) user_ranks: Arc<U>,
    pub(crate) rank_changes: Arc<R>,
    clock: Arc<C>,
    pub(crate) config: ScoringConfig,
    pub(crate) write_lock: Mutex<()>,
}

impl<K, W, U, R, C> RankingService<K, W, U, R, C>
where
    K: KpiRepository,
    W: WeeklyKpiRepository,
    U: UserRankRepository,
    R: RankChangeRepository,
    C: Clock,
{
    pub fn new(
        kpis: Arc<K>,
        weeks: Arc<W>,
        user_ranks: Arc<U>,
        rank_changes: Arc<R>,
        clock: Arc<C>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            kpis,
            weeks,
            user_ranks,
            rank_changes,
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn current_week(&self) -> WeekKey {
        self.clock.current_week()
    }

    pub fn last_completed_week(&self) -> WeekKey {
        self.clock.last_completed_week()
    }

    /// Current rank snapshot, the initial rank if nothing was assessed yet
    pub async fn get_user_rank(&self) -> Result<UserRank, AppError> {
        Ok(self.user_ranks.get().await?.unwrap_or_default())
    }

    /// Completion and KPI breakdown for a week without persisting anything
    pub async fn preview_week_completion(
        &self,
        week_key: WeekKey,
    ) -> Result<WeekProgress, AppError> {
        let record = self.load_record(&week_key).await?;
        let kpis = self.kpis.find_active().await?;
        let completion = calculate_week_completion(&record.values, &kpis);

        Ok(WeekProgress {
            week_key,
            completion_percentage: completion,
            completion_display: completion.round() as i32,
            kpi_breakdown: kpi_breakdown(&record, &kpis),
        })
    }

    /// True when the most recently completed week has no rank change yet
    pub async fn needs_weekly_assessment(&self) -> Result<bool, AppError> {
        let week = self.last_completed_week();
        Ok(self.rank_changes.find_by_week(&week).await?.is_none())
    }

    /// Assess the most recently completed week if it was not assessed yet
    pub async fn assess_if_needed(&self) -> Result<Option<WeeklyAssessment>, AppError> {
        if !self.needs_weekly_assessment().await? {
            return Ok(None);
        }
        let week = self.last_completed_week();
        self.assess_weekly_performance(week).await.map(Some)
    }

    /// Score a week and persist the result.
    ///
    /// Re-assessing a week replaces its record and starts from the same RR
    /// as before, so unchanged data yields an identical record. Weeks after
    /// it are recomputed so the history stays a consistent chain.
    pub async fn assess_weekly_performance(
        &self,
        week_key: WeekKey,
    ) -> Result<WeeklyAssessment, AppError> {
        let _guard = self.write_lock.lock().await;

        let record = self.load_record(&week_key).await?;
        let kpis = self.kpis.find_active().await?;

        let mut history = self.rank_changes.list().await?;
        sort_oldest_first(&mut history);

        let old_rr = self.starting_rr(&week_key, &history).await?;
        let (change, breakdown) = score_week(&record, &kpis, old_rr, &self.config);

        let mut rechained = Vec::new();
        let mut rr = change.new_rr;
        for later in history.iter().filter(|c| c.week_key > week_key) {
            let later_record = self.load_record(&later.week_key).await?;
            let (later_change, _) = score_week(&later_record, &kpis, rr, &self.config);
            rr = later_change.new_rr;
            rechained.push(later_change);
        }

        let mut written = Vec::with_capacity(rechained.len() + 1);
        written.push(change.clone());
        written.extend(rechained.iter().cloned());

        let mut updated: Vec<RankChange> = history
            .into_iter()
            .filter(|c| c.week_key < week_key)
            .collect();
        updated.extend(written.iter().cloned());

        let user_rank = UserRank::from_history(&updated, self.config.week_completed_percent)
            .unwrap_or_default();
        self.rank_changes
            .record_assessment(&written, &user_rank)
            .await?;

        tracing::info!(
            week_key = %week_key,
            completion = change.completion_percentage,
            old_rr = change.old_rr,
            new_rr = change.new_rr,
            delta = change.rr_change,
            old_rank = %change.old_rank,
            new_rank = %change.new_rank,
            rechained = rechained.len(),
            "Weekly assessment applied"
        );

        let transition = change.transition();
        if transition.is_change() {
            tracing::info!(
                week_key = %week_key,
                from = %change.old_rank,
                to = %change.new_rank,
                ?transition,
                "Rank tier changed"
            );
        }

        Ok(WeeklyAssessment::from_change(&change, breakdown))
    }

    /// Weekly record for a week, all-zero when none was logged
    pub(crate) async fn load_record(&self, week_key: &WeekKey) -> Result<WeeklyKpiRecord, AppError> {
        Ok(self
            .weeks
            .find_by_week(week_key)
            .await?
            .unwrap_or_else(|| WeeklyKpiRecord::empty(*week_key)))
    }

    /// RR a week starts from, given the history sorted oldest first
    async fn starting_rr(&self, week_key: &WeekKey, history: &[RankChange]) -> Result<i32, AppError> {
        if let Some(prior) = history.iter().rev().find(|c| c.week_key < *week_key) {
            return Ok(prior.new_rr);
        }
        if let Some(existing) = history.iter().find(|c| c.week_key == *week_key) {
            return Ok(existing.old_rr);
        }
        if let Some(earliest) = history.first() {
            return Ok(earliest.old_rr);
        }
        Ok(self
            .user_ranks
            .get()
            .await?
            .map(|rank| rank.rr_points)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RankTier, TierTransition};
    use crate::test_utils::{
        test_kpi, test_rank_change, test_record, FixedClock, InMemoryKpiRepository,
        InMemoryRankChangeRepository, InMemoryUserRankRepository, InMemoryWeeklyKpiRepository,
    };

    type TestService = RankingService<
        InMemoryKpiRepository,
        InMemoryWeeklyKpiRepository,
        InMemoryUserRankRepository,
        InMemoryRankChangeRepository,
        FixedClock,
    >;

    struct Harness {
        service: TestService,
        user_ranks: Arc<InMemoryUserRankRepository>,
        rank_changes: Arc<InMemoryRankChangeRepository>,
        weeks: Arc<InMemoryWeeklyKpiRepository>,
    }

    fn week(s: &str) -> WeekKey {
        s.parse().unwrap()
    }

    fn harness(
        weeks: InMemoryWeeklyKpiRepository,
        user_ranks: InMemoryUserRankRepository,
        rank_changes: InMemoryRankChangeRepository,
    ) -> Harness {
        let kpis = Arc::new(InMemoryKpiRepository::new().with_kpi(test_kpi("training", 4.0, 1.0)));
        let weeks = Arc::new(weeks);
        let rank_changes = Arc::new(rank_changes.linked_to(&user_ranks));
        let user_ranks = Arc::new(user_ranks);
        // Wednesday of 2025-W08, so the last completed week is 2025-W07
        let clock = Arc::new(FixedClock::on(2025, 2, 19));

        let service = RankingService::new(
            kpis,
            weeks.clone(),
            user_ranks.clone(),
            rank_changes.clone(),
            clock,
            ScoringConfig::default(),
        );

        Harness {
            service,
            user_ranks,
            rank_changes,
            weeks,
        }
    }

    #[tokio::test]
    async fn full_week_at_top_of_gold_promotes() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new().with_rank(UserRank {
                current_rank: RankTier::Gold,
                rr_points: 980,
                weeks_completed: 0,
                total_weeks: 0,
            }),
            InMemoryRankChangeRepository::new(),
        );

        let assessment = h
            .service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .expect("assessment should succeed");

        assert_eq!(assessment.completion_display, 100);
        assert_eq!(assessment.rr_change, 20);
        assert_eq!(assessment.rank_before, RankTier::Gold);
        assert_eq!(assessment.rank_after, RankTier::Platinum);
        assert_eq!(assessment.transition, TierTransition::Promoted);
        assert_eq!(assessment.kpi_breakdown.len(), 1);
        assert!(assessment.kpi_breakdown[0].completed);

        let stored = h.rank_changes.find_by_week(&week("2025-W07")).await.unwrap().unwrap();
        assert_eq!(stored.old_rr, 980);
        assert_eq!(stored.new_rr, 1000);
        assert_eq!(stored.new_rank, RankTier::Platinum);

        let rank = h.user_ranks.get().await.unwrap().unwrap();
        assert_eq!(rank.rr_points, 1000);
        assert_eq!(rank.current_rank, RankTier::Platinum);
        assert_eq!(rank.total_weeks, 1);
        assert_eq!(rank.weeks_completed, 1);
    }

    #[tokio::test]
    async fn missing_week_record_scores_zero() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new(),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        let assessment = h
            .service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .expect("missing data is not an error");

        assert_eq!(assessment.completion_percentage, 0.0);
        // Already at 0, so the loss is absorbed by the floor
        assert_eq!(assessment.rr_change, 0);
        assert_eq!(assessment.rr_after, 0);

        let rank = h.user_ranks.get().await.unwrap().unwrap();
        assert_eq!(rank.total_weeks, 1);
        assert_eq!(rank.weeks_completed, 0);
    }

    #[tokio::test]
    async fn reassessment_is_idempotent() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W07", &[("training", 3.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        h.service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .unwrap();
        let first = h.rank_changes.list().await.unwrap();
        let first_rank = h.user_ranks.get().await.unwrap();

        h.service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .unwrap();
        let second = h.rank_changes.list().await.unwrap();
        let second_rank = h.user_ranks.get().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(first_rank, second_rank);
        assert_eq!(second_rank.unwrap().total_weeks, 1);
    }

    #[tokio::test]
    async fn consecutive_weeks_chain() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W06", &[("training", 4.0)]))
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        h.service
            .assess_weekly_performance(week("2025-W06"))
            .await
            .unwrap();
        let second = h
            .service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .unwrap();

        assert_eq!(second.rr_before, 30);
        assert_eq!(second.rr_after, 60);

        let rank = h.user_ranks.get().await.unwrap().unwrap();
        assert_eq!(rank.rr_points, 60);
        assert_eq!(rank.total_weeks, 2);
    }

    #[tokio::test]
    async fn reassessing_earlier_week_rechains_later_weeks() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W06", &[("training", 2.0)]))
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        h.service
            .assess_weekly_performance(week("2025-W06"))
            .await
            .unwrap();
        h.service
            .assess_weekly_performance(week("2025-W07"))
            .await
            .unwrap();

        // W06 was at breakeven; log more training and re-assess it
        h.weeks
            .upsert(&test_record("2025-W06", &[("training", 4.0)]))
            .await
            .unwrap();
        h.service
            .assess_weekly_performance(week("2025-W06"))
            .await
            .unwrap();

        let w06 = h.rank_changes.find_by_week(&week("2025-W06")).await.unwrap().unwrap();
        let w07 = h.rank_changes.find_by_week(&week("2025-W07")).await.unwrap().unwrap();
        assert_eq!(w06.new_rr, 30);
        assert_eq!(w07.old_rr, 30);
        assert_eq!(w07.new_rr, 60);

        let rank = h.user_ranks.get().await.unwrap().unwrap();
        assert_eq!(rank.rr_points, 60);
        assert_eq!(rank.total_weeks, 2);
    }

    #[tokio::test]
    async fn needs_assessment_tracks_last_completed_week() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new(),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new().with_change(test_rank_change("2025-W06", 0, 30)),
        );

        assert!(h.service.needs_weekly_assessment().await.unwrap());

        let assessed = h.service.assess_if_needed().await.unwrap();
        assert_eq!(assessed.map(|a| a.week_key), Some(week("2025-W07")));

        assert!(!h.service.needs_weekly_assessment().await.unwrap());
        assert!(h.service.assess_if_needed().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_and_rank_untouched() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new().failing_writes(),
        );

        let result = h.service.assess_weekly_performance(week("2025-W07")).await;

        assert!(result.is_err());
        assert!(h.user_ranks.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rank_write_failure_leaves_week_unassessed() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new().failing_rank_writes(),
        );

        let result = h.service.assess_weekly_performance(week("2025-W07")).await;

        assert!(result.is_err());
        assert!(h.rank_changes.list().await.unwrap().is_empty());
        assert!(h.user_ranks.get().await.unwrap().is_none());
        // Nothing was committed, so the week is retried
        assert!(h.service.needs_weekly_assessment().await.unwrap());
    }

    #[tokio::test]
    async fn failure_while_rechaining_keeps_history() {
        let w06 = test_rank_change("2025-W06", 0, 0);
        let w07 = test_rank_change("2025-W07", 0, 30);
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W06", &[("training", 4.0)]))
                .with_record(test_record("2025-W07", &[("training", 4.0)])),
            InMemoryUserRankRepository::new().with_rank(UserRank {
                current_rank: RankTier::Bronze,
                rr_points: 30,
                weeks_completed: 1,
                total_weeks: 2,
            }),
            InMemoryRankChangeRepository::new()
                .with_change(w06.clone())
                .with_change(w07.clone())
                .failing_on_week(week("2025-W07")),
        );
        let rank_before = h.user_ranks.get().await.unwrap();

        let result = h.service.assess_weekly_performance(week("2025-W06")).await;

        assert!(result.is_err());
        assert_eq!(h.rank_changes.find_by_week(&week("2025-W06")).await.unwrap(), Some(w06));
        assert_eq!(h.rank_changes.find_by_week(&week("2025-W07")).await.unwrap(), Some(w07));
        assert_eq!(h.user_ranks.get().await.unwrap(), rank_before);
    }

    #[tokio::test]
    async fn preview_does_not_persist() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new()
                .with_record(test_record("2025-W08", &[("training", 2.0)])),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        let progress = h
            .service
            .preview_week_completion(h.service.current_week())
            .await
            .unwrap();

        assert_eq!(progress.week_key, week("2025-W08"));
        assert_eq!(progress.completion_display, 50);
        assert!(h.rank_changes.list().await.unwrap().is_empty());
        assert!(h.user_ranks.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_user_rank_defaults_to_initial() {
        let h = harness(
            InMemoryWeeklyKpiRepository::new(),
            InMemoryUserRankRepository::new(),
            InMemoryRankChangeRepository::new(),
        );

        let rank = h.service.get_user_rank().await.unwrap();
        assert_eq!(rank, UserRank::initial());
    }
}
