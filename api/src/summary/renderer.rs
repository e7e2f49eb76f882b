//! Summary renderer
//!
//! Renders rank data to LLM-readable markdown format.

use crate::app::{HistoryRegeneration, ImportSummary};
use crate::domain::entities::{
    KpiProgress, RankChange, RankTier, TierTransition, UserRank, WeekKey, WeekProgress,
    WeeklyAssessment, RANK_TABLE,
};

fn signed(delta: i32) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn tier_label(tier: RankTier) -> String {
    let info = tier.info();
    format!("{} {}", info.icon, info.name)
}

fn rr_range(tier: RankTier) -> String {
    match tier.max_rr() {
        Some(max) => format!("{}-{}", tier.min_rr(), max - 1),
        None => format!("{}+", tier.min_rr()),
    }
}

/// Render the current rank snapshot
pub fn render_rank_status(rank: &UserRank) -> String {
    let mut buf = String::new();

    buf.push_str("# Rank Status\n\n");
    buf.push_str(&format!("**Rank:** {}\n", tier_label(rank.current_rank)));
    buf.push_str(&format!("**RR:** {}\n", rank.rr_points));
    match rank.rr_to_next_tier() {
        Some(needed) => buf.push_str(&format!("**To next tier:** {} RR\n", needed)),
        None => buf.push_str("**To next tier:** top tier reached\n"),
    }
    buf.push_str(&format!(
        "**Weeks completed:** {} of {}\n",
        rank.weeks_completed, rank.total_weeks
    ));

    if rank.total_weeks == 0 {
        buf.push_str("\n_No weeks assessed yet._\n");
    }

    buf
}

/// Render the rank table, marking the current tier
pub fn render_rank_tiers(current: Option<RankTier>) -> String {
    let mut buf = String::new();

    buf.push_str("# Rank Tiers\n\n");
    buf.push_str("| Tier | RR |\n");
    buf.push_str("|------|----|\n");
    for info in RANK_TABLE.iter() {
        let marker = if Some(info.tier) == current { " <- you" } else { "" };
        buf.push_str(&format!(
            "| {} {}{} | {} |\n",
            info.icon,
            info.name,
            marker,
            rr_range(info.tier)
        ));
    }

    buf
}

fn render_kpi_line(kpi: &KpiProgress) -> String {
    let check = if kpi.completed { "[x]" } else { "[ ]" };
    format!(
        "- {} {}: {} / {} ({}%)\n",
        check,
        kpi.name,
        kpi.value,
        kpi.target,
        kpi.percentage.round() as i32
    )
}

fn render_breakdown(buf: &mut String, breakdown: &[KpiProgress]) {
    buf.push_str("## KPIs\n\n");
    if breakdown.is_empty() {
        buf.push_str("_No active KPIs._\n");
        return;
    }
    for kpi in breakdown {
        buf.push_str(&render_kpi_line(kpi));
    }
}

/// Render the result of a weekly assessment
pub fn render_assessment(assessment: &WeeklyAssessment) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# Weekly Assessment: {}\n\n", assessment.week_key));
    buf.push_str(&format!(
        "**Completion:** {}%\n",
        assessment.completion_display
    ));
    buf.push_str(&format!(
        "**RR:** {} -> {} ({})\n",
        assessment.rr_before,
        assessment.rr_after,
        signed(assessment.rr_change)
    ));

    match assessment.transition {
        TierTransition::Promoted => buf.push_str(&format!(
            "**Promoted:** {} -> {}\n",
            tier_label(assessment.rank_before),
            tier_label(assessment.rank_after)
        )),
        TierTransition::Demoted => buf.push_str(&format!(
            "**Demoted:** {} -> {}\n",
            tier_label(assessment.rank_before),
            tier_label(assessment.rank_after)
        )),
        TierTransition::Unchanged => buf.push_str(&format!(
            "**Rank:** {}\n",
            tier_label(assessment.rank_after)
        )),
    }
    buf.push('\n');

    render_breakdown(&mut buf, &assessment.kpi_breakdown);
    buf
}

/// Render completion progress for a week
pub fn render_week_progress(progress: &WeekProgress) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# Week {} Progress\n\n", progress.week_key));
    buf.push_str(&format!(
        "**Completion:** {}%\n\n",
        progress.completion_display
    ));
    render_breakdown(&mut buf, &progress.kpi_breakdown);
    buf
}

fn render_history_table(buf: &mut String, history: &[RankChange]) {
    if history.is_empty() {
        buf.push_str("_No rank history yet._\n");
        return;
    }

    buf.push_str("| Week | Completion | RR | Change | Rank |\n");
    buf.push_str("|------|------------|----|--------|------|\n");
    for change in history {
        let rank = match change.transition() {
            TierTransition::Unchanged => change.new_rank.info().name.to_string(),
            _ => format!(
                "{} -> {}",
                change.old_rank.info().name,
                change.new_rank.info().name
            ),
        };
        buf.push_str(&format!(
            "| {} | {}% | {} | {} | {} |\n",
            change.week_key,
            change.completion_percentage.round() as i32,
            change.new_rr,
            signed(change.rr_change),
            rank
        ));
    }
}

/// Render rank history, newest first
pub fn render_history(history: &[RankChange]) -> String {
    let mut buf = String::new();
    buf.push_str("# Rank History\n\n");
    render_history_table(&mut buf, history);
    buf
}

/// Render the outcome of a history regeneration
pub fn render_regeneration(result: &HistoryRegeneration) -> String {
    let mut buf = String::new();

    buf.push_str("# Rank History Regenerated\n\n");
    buf.push_str(&format!("**Weeks replayed:** {}\n", result.weeks_replayed));
    buf.push_str(&format!(
        "**Rank:** {} ({} RR)\n",
        tier_label(result.user_rank.current_rank),
        result.user_rank.rr_points
    ));
    buf.push_str(&format!(
        "**Weeks completed:** {} of {}\n\n",
        result.user_rank.weeks_completed, result.user_rank.total_weeks
    ));
    render_history_table(&mut buf, &result.history);
    buf
}

/// Render whether the last completed week still needs assessing
pub fn render_needs_assessment(week_key: WeekKey, needed: bool) -> String {
    if needed {
        format!("Week {} has not been assessed yet.\n", week_key)
    } else {
        format!("Week {} is already assessed.\n", week_key)
    }
}

/// Render a daily log import summary
pub fn render_import_summary(summary: &ImportSummary) -> String {
    let mut buf = String::new();

    buf.push_str("# Daily Log Imported\n\n");
    buf.push_str(&format!("**Days imported:** {}\n", summary.rows_imported));
    buf.push_str(&format!("**Rows skipped:** {}\n", summary.rows_skipped));
    if summary.weeks_updated.is_empty() {
        buf.push_str("**Weeks updated:** none\n");
    } else {
        let weeks: Vec<String> = summary.weeks_updated.iter().map(|w| w.to_string()).collect();
        buf.push_str(&format!("**Weeks updated:** {}\n", weeks.join(", ")));
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_rank_change;

    fn week(s: &str) -> WeekKey {
        s.parse().unwrap()
    }

    fn progress(name: &str, value: f64, target: f64) -> KpiProgress {
        let percentage = (100.0 * value / target).min(100.0);
        KpiProgress {
            kpi_id: name.to_lowercase(),
            name: name.to_string(),
            value,
            target,
            weight: 1.0,
            percentage,
            completed: percentage >= 100.0,
        }
    }

    // ===== render_rank_status tests =====

    #[test]
    fn render_rank_status_initial() {
        let result = render_rank_status(&UserRank::initial());

        assert!(result.contains("# Rank Status"));
        assert!(result.contains("**Rank:** 🥉 Bronze"));
        assert!(result.contains("**RR:** 0"));
        assert!(result.contains("**To next tier:** 200 RR"));
        assert!(result.contains("_No weeks assessed yet._"));
    }

    #[test]
    fn render_rank_status_top_tier() {
        let rank = UserRank {
            current_rank: RankTier::Grandmaster,
            rr_points: 3100,
            weeks_completed: 90,
            total_weeks: 120,
        };

        let result = render_rank_status(&rank);

        assert!(result.contains("**Rank:** 🏆 Grandmaster"));
        assert!(result.contains("top tier reached"));
        assert!(result.contains("**Weeks completed:** 90 of 120"));
        assert!(!result.contains("_No weeks assessed yet._"));
    }

    // ===== render_rank_tiers tests =====

    #[test]
    fn render_rank_tiers_marks_current() {
        let result = render_rank_tiers(Some(RankTier::Gold));

        assert!(result.contains("| 🥉 Bronze | 0-199 |"));
        assert!(result.contains("| 🥇 Gold <- you | 500-999 |"));
        assert!(result.contains("| 🏆 Grandmaster | 2800+ |"));
        assert_eq!(result.matches("<- you").count(), 1);
    }

    // ===== render_assessment tests =====

    #[test]
    fn render_assessment_promotion() {
        let mut change = test_rank_change("2025-W07", 980, 1000);
        change.completion_percentage = 100.0;
        let assessment =
            WeeklyAssessment::from_change(&change, vec![progress("Training", 4.0, 4.0)]);

        let result = render_assessment(&assessment);

        assert!(result.contains("# Weekly Assessment: 2025-W07"));
        assert!(result.contains("**Completion:** 100%"));
        assert!(result.contains("**RR:** 980 -> 1000 (+20)"));
        assert!(result.contains("**Promoted:** 🥇 Gold -> 💠 Platinum"));
        assert!(result.contains("- [x] Training: 4 / 4 (100%)"));
    }

    #[test]
    fn render_assessment_loss_without_tier_change() {
        let change = test_rank_change("2025-W07", 45, 40);
        let assessment =
            WeeklyAssessment::from_change(&change, vec![progress("Reading", 1.5, 6.0)]);

        let result = render_assessment(&assessment);

        assert!(result.contains("**RR:** 45 -> 40 (-5)"));
        assert!(result.contains("**Rank:** 🥉 Bronze"));
        assert!(result.contains("- [ ] Reading: 1.5 / 6 (25%)"));
    }

    // ===== render_week_progress tests =====

    #[test]
    fn render_week_progress_without_kpis() {
        let progress = WeekProgress {
            week_key: week("2025-W08"),
            completion_percentage: 0.0,
            completion_display: 0,
            kpi_breakdown: vec![],
        };

        let result = render_week_progress(&progress);

        assert!(result.contains("# Week 2025-W08 Progress"));
        assert!(result.contains("_No active KPIs._"));
    }

    // ===== render_history tests =====

    #[test]
    fn render_history_empty() {
        assert!(render_history(&[]).contains("_No rank history yet._"));
    }

    #[test]
    fn render_history_rows() {
        let history = vec![
            test_rank_change("2025-W02", 190, 215),
            test_rank_change("2025-W01", 200, 190),
        ];

        let result = render_history(&history);

        assert!(result.contains("| 2025-W02 | 75% | 215 | +25 | Bronze -> Silver |"));
        assert!(result.contains("| 2025-W01 | 25% | 190 | -10 | Silver -> Bronze |"));
    }

    // ===== misc =====

    #[test]
    fn render_needs_assessment_states() {
        assert!(render_needs_assessment(week("2025-W07"), true).contains("not been assessed"));
        assert!(render_needs_assessment(week("2025-W07"), false).contains("already assessed"));
    }

    #[test]
    fn render_import_summary_lists_weeks() {
        let summary = ImportSummary {
            rows_imported: 6,
            rows_skipped: 2,
            weeks_updated: vec![week("2025-W17"), week("2025-W18")],
        };

        let result = render_import_summary(&summary);

        assert!(result.contains("**Days imported:** 6"));
        assert!(result.contains("**Weeks updated:** 2025-W17, 2025-W18"));
    }

    #[test]
    fn render_regeneration_summary() {
        let result = render_regeneration(&HistoryRegeneration {
            weeks_replayed: 1,
            user_rank: UserRank {
                current_rank: RankTier::Bronze,
                rr_points: 30,
                weeks_completed: 1,
                total_weeks: 1,
            },
            history: vec![test_rank_change("2025-W01", 0, 30)],
        });

        assert!(result.contains("**Weeks replayed:** 1"));
        assert!(result.contains("**Rank:** 🥉 Bronze (30 RR)"));
        assert!(result.contains("| 2025-W01 | 75% | 30 | +30 | Bronze |"));
    }
}
