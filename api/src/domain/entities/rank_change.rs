//! Rank change domain entity
//!
//! One record per assessed week. The history is a chain: each record's
//! `old_rr` is the previous record's `new_rr`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rank::{RankTier, TierTransition};
use super::week_key::WeekKey;

/// Persisted result of assessing a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankChange {
    pub week_key: WeekKey,
    pub old_rank: RankTier,
    pub new_rank: RankTier,
    pub old_rr: i32,
    pub new_rr: i32,
    /// `new_rr - old_rr`, after the 0 floor
    pub rr_change: i32,
    pub completion_percentage: f64,
    /// When the assessed week closed
    pub timestamp: DateTime<Utc>,
}

impl RankChange {
    pub fn transition(&self) -> TierTransition {
        TierTransition::between(self.old_rr, self.new_rr)
    }
}

/// Sort records newest first
pub fn sort_newest_first(history: &mut [RankChange]) {
    history.sort_by(|a, b| b.week_key.cmp(&a.week_key));
}

/// Sort records oldest first
pub fn sort_oldest_first(history: &mut [RankChange]) {
    history.sort_by(|a, b| a.week_key.cmp(&b.week_key));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(week: &str, old_rr: i32, new_rr: i32, rr_change: i32) -> RankChange {
        let week_key: WeekKey = week.parse().unwrap();
        RankChange {
            week_key,
            old_rank: RankTier::from_rr(old_rr),
            new_rank: RankTier::from_rr(new_rr),
            old_rr,
            new_rr,
            rr_change,
            completion_percentage: 75.0,
            timestamp: week_key.closed_at(),
        }
    }

    #[test]
    fn floored_loss_records_applied_delta() {
        let floored = change("2025-W07", 5, 0, -5);
        assert_eq!(floored.old_rr + floored.rr_change, floored.new_rr);
        assert_eq!(floored.transition(), TierTransition::Unchanged);
    }

    #[test]
    fn transition_detects_promotion() {
        let promoted = change("2025-W07", 980, 1000, 20);
        assert_eq!(promoted.transition(), TierTransition::Promoted);
    }

    #[test]
    fn sorting_uses_week_order() {
        let mut history = vec![
            change("2024-W52", 0, 10, 10),
            change("2025-W02", 20, 30, 10),
            change("2025-W01", 10, 20, 10),
        ];

        sort_newest_first(&mut history);
        assert_eq!(history[0].week_key.to_string(), "2025-W02");
        assert_eq!(history[2].week_key.to_string(), "2024-W52");

        sort_oldest_first(&mut history);
        assert_eq!(history[0].week_key.to_string(), "2024-W52");
    }

    #[test]
    fn serializes_week_key_and_rank_as_strings() {
        let json = serde_json::to_value(change("2025-W07", 980, 1000, 20)).unwrap();
        assert_eq!(json["week_key"], "2025-W07");
        assert_eq!(json["old_rank"], "gold");
        assert_eq!(json["new_rank"], "platinum");
    }
}
