//! Current rank snapshot for the user

use serde::{Deserialize, Serialize};

use super::rank::RankTier;
use super::rank_change::RankChange;

/// Current state of the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRank {
    pub current_rank: RankTier,
    /// Cumulative RR, never negative
    pub rr_points: i32,
    /// Weeks whose completion reached the "completed" threshold
    pub weeks_completed: i32,
    pub total_weeks: i32,
}

impl Default for UserRank {
    fn default() -> Self {
        Self::initial()
    }
}

impl UserRank {
    /// Starting point: lowest tier, 0 RR
    pub fn initial() -> Self {
        Self {
            current_rank: RankTier::lowest(),
            rr_points: 0,
            weeks_completed: 0,
            total_weeks: 0,
        }
    }

    /// Derive the snapshot from the full history.
    ///
    /// RR and rank come from the newest record; counts come from all records.
    /// Returns `None` for an empty history.
    pub fn from_history(history: &[RankChange], completed_threshold: f64) -> Option<Self> {
        let latest = history.iter().max_by_key(|c| c.week_key)?;

        Some(Self {
            current_rank: RankTier::from_rr(latest.new_rr),
            rr_points: latest.new_rr.max(0),
            weeks_completed: history
                .iter()
                .filter(|c| c.completion_percentage >= completed_threshold)
                .count() as i32,
            total_weeks: history.len() as i32,
        })
    }

    /// RR still needed to reach the next tier, `None` at the top
    pub fn rr_to_next_tier(&self) -> Option<i32> {
        self.current_rank
            .max_rr()
            .map(|max| (max - self.rr_points).max(0))
    }
}
