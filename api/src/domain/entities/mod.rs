//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod assessment;
pub mod daily_metrics;
pub mod kpi;
pub mod rank;
pub mod rank_change;
pub mod user_rank;
pub mod week_key;

pub use assessment::{KpiProgress, WeekProgress, WeeklyAssessment};
pub use daily_metrics::DailyMetrics;
pub use kpi::{validate_values, KpiDefinition, WeeklyKpiRecord};
#[allow(unused_imports)]
pub use rank::{RankTier, TierInfo, TierTransition, RANK_TABLE};
pub use rank_change::{sort_newest_first, sort_oldest_first, RankChange};
pub use user_rank::UserRank;
pub use week_key::WeekKey;
