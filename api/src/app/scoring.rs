//! Weekly scoring
//!
//! Pure functions turning a week of KPI values into a completion percentage,
//! an RR delta and a rank change. Same inputs always give the same output,
//! which is what makes history regeneration reproducible.

use std::collections::BTreeMap;

use crate::app::rank_config::{ScoringConfig, KPI_COMPLETED_PERCENT, MAX_KPI_PROGRESS};
use crate::domain::entities::{
    KpiDefinition, KpiProgress, RankChange, RankTier, WeekKey, WeeklyKpiRecord,
};

/// Progress toward one KPI's target, in `[0, 100]`
pub fn kpi_progress(value: f64, kpi: &KpiDefinition) -> f64 {
    if !kpi.is_scored() || !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    (100.0 * value / kpi.target).min(MAX_KPI_PROGRESS)
}

/// Weighted mean of per-KPI progress over the scored KPIs.
///
/// Inactive KPIs and those with a non-positive target or weight are skipped.
/// Missing values count as 0. Returns 0 when nothing is scored.
pub fn calculate_week_completion(values: &BTreeMap<String, f64>, kpis: &[KpiDefinition]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for kpi in kpis.iter().filter(|k| k.is_scored()) {
        let value = values.get(&kpi.id).copied().unwrap_or(0.0);
        weighted_sum += kpi.weight * kpi_progress(value, kpi);
        total_weight += kpi.weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }

    (weighted_sum / total_weight).clamp(0.0, 100.0)
}

/// Per-KPI detail for the scored KPIs of a week
pub fn kpi_breakdown(record: &WeeklyKpiRecord, kpis: &[KpiDefinition]) -> Vec<KpiProgress> {
    kpis.iter()
        .filter(|k| k.is_scored())
        .map(|kpi| {
            let value = record.value(&kpi.id);
            let percentage = kpi_progress(value, kpi);
            KpiProgress {
                kpi_id: kpi.id.clone(),
                name: kpi.name.clone(),
                value,
                target: kpi.target,
                weight: kpi.weight,
                percentage,
                completed: percentage >= KPI_COMPLETED_PERCENT,
            }
        })
        .collect()
}

/// Signed RR delta for a week's completion at the given tier.
///
/// Piecewise linear around the breakeven point: above it the tier's
/// `base_gain` is scaled by how far completion is toward 100, below it the
/// tier's `base_loss` is scaled by how far it is toward 0. Any completion
/// off the breakeven point moves RR by at least 1.
pub fn calculate_rr_change(completion: f64, rank: RankTier, config: &ScoringConfig) -> i32 {
    let completion = if completion.is_finite() {
        completion.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let breakeven = config.breakeven_percent;
    let curve = config.curve(rank);

    if completion >= breakeven {
        if completion == breakeven {
            return 0;
        }
        let raw = curve.base_gain as f64 * (completion - breakeven) / (100.0 - breakeven);
        (raw.round() as i32).max(1)
    } else {
        let raw = curve.base_loss as f64 * (breakeven - completion) / breakeven;
        -(raw.round() as i32).max(1)
    }
}

/// Apply a delta to a cumulative total, flooring at 0
pub fn apply_rr_change(old_rr: i32, delta: i32) -> i32 {
    old_rr.max(0).saturating_add(delta).max(0)
}

/// Score one week starting from `old_rr`.
///
/// Returns the rank change record and the KPI breakdown; nothing is persisted.
pub fn score_week(
    record: &WeeklyKpiRecord,
    kpis: &[KpiDefinition],
    old_rr: i32,
    config: &ScoringConfig,
) -> (RankChange, Vec<KpiProgress>) {
    let week_key: WeekKey = record.week_key;
    let old_rr = old_rr.max(0);
    let old_rank = RankTier::from_rr(old_rr);

    let completion = calculate_week_completion(&record.values, kpis);
    let new_rr = apply_rr_change(old_rr, calculate_rr_change(completion, old_rank, config));

    let change = RankChange {
        week_key,
        old_rank,
        new_rank: RankTier::from_rr(new_rr),
        old_rr,
        new_rr,
        // Applied delta, so `old_rr + rr_change == new_rr` even at the floor
        rr_change: new_rr - old_rr,
        completion_percentage: completion,
        timestamp: week_key.closed_at(),
    };

    (change, kpi_breakdown(record, kpis))
}
