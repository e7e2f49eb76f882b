//! Weekly assessment result
//!
//! Derived data, recomputable from the weekly record and KPI definitions.

use serde::Serialize;

use super::rank::{RankTier, TierTransition};
use super::rank_change::RankChange;
use super::week_key::WeekKey;

/// Per-KPI progress for one week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiProgress {
    pub kpi_id: String,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub weight: f64,
    /// Progress toward the target, capped at 100
    pub percentage: f64,
    pub completed: bool,
}

/// Summary returned by an assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAssessment {
    pub week_key: WeekKey,
    pub completion_percentage: f64,
    /// Completion rounded for display
    pub completion_display: i32,
    pub rr_change: i32,
    pub rr_before: i32,
    pub rr_after: i32,
    pub rank_before: RankTier,
    pub rank_after: RankTier,
    pub transition: TierTransition,
    pub kpi_breakdown: Vec<KpiProgress>,
}

impl WeeklyAssessment {
    pub fn from_change(change: &RankChange, kpi_breakdown: Vec<KpiProgress>) -> Self {
        Self {
            week_key: change.week_key,
            completion_percentage: change.completion_percentage,
            completion_display: change.completion_percentage.round() as i32,
            rr_change: change.rr_change,
            rr_before: change.old_rr,
            rr_after: change.new_rr,
            rank_before: change.old_rank,
            rank_after: change.new_rank,
            transition: change.transition(),
            kpi_breakdown,
        }
    }
}

/// Completion preview for a week, nothing persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekProgress {
    pub week_key: WeekKey,
    pub completion_percentage: f64,
    pub completion_display: i32,
    pub kpi_breakdown: Vec<KpiProgress>,
}
