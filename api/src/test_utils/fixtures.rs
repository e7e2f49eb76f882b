//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::collections::BTreeMap;

use crate::domain::entities::{KpiDefinition, RankChange, RankTier, WeekKey, WeeklyKpiRecord};

/// Create an active KPI; the name is derived from the id
pub fn test_kpi(id: &str, target: f64, weight: f64) -> KpiDefinition {
    let mut name = id.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    KpiDefinition {
        id: id.to_string(),
        name,
        target,
        weight,
        unit: None,
        is_active: true,
    }
}

/// Create a weekly record from `(kpi_id, value)` pairs
pub fn test_record(week_key: &str, values: &[(&str, f64)]) -> WeeklyKpiRecord {
    WeeklyKpiRecord {
        week_key: week_key.parse().expect("valid week key"),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Create a rank change moving from `old_rr` to `new_rr`
pub fn test_rank_change(week_key: &str, old_rr: i32, new_rr: i32) -> RankChange {
    let week_key: WeekKey = week_key.parse().expect("valid week key");
    RankChange {
        week_key,
        old_rank: RankTier::from_rr(old_rr),
        new_rank: RankTier::from_rr(new_rr),
        old_rr,
        new_rr,
        rr_change: new_rr - old_rr,
        completion_percentage: if new_rr >= old_rr { 75.0 } else { 25.0 },
        timestamp: week_key.closed_at(),
    }
}
