//! Daily log import
//!
//! Ingests the daily log spreadsheet export (one row per day), stores the
//! per-day metrics and rolls each touched week up into weekly KPI values.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{DailyMetrics, WeekKey, WeeklyKpiRecord};
use crate::domain::ports::{DailyMetricsRepository, WeeklyKpiRepository};
use crate::error::{AppError, ImportError};

/// Weekly KPI ids produced by the roll-up
pub const KPI_TRAINING: &str = "training";
pub const KPI_DEEP_WORK: &str = "deepWork";
pub const KPI_READING: &str = "reading";
pub const KPI_SLEEP: &str = "sleep";
pub const KPI_COLD_SHOWER: &str = "coldShower";
pub const KPI_NO_DOPAMINE: &str = "noDopamine";
pub const KPI_PROTEIN: &str = "protein";
pub const KPI_WEIGHT: &str = "weight";

const COL_DATE: &str = "Date";
const COL_HRV: &str = "HRV";
const COL_CALORIES: &str = "Calories";
const COL_DEEP_WORK: &str = "Deep Work (hrs)";
const COL_RECOVERY: &str = "Recovery";
const COL_SLEEP_TIME: &str = "Sleep Time";
const COL_COLD_SHOWER: &str = "Cold Shower";
const COL_NO_DOPAMINE: &str = "No Dopamine";
const COL_SLEEP_HOURS: &str = "Sleep (hrs)";
const COL_WAKE_TIME: &str = "Wake Time";
const COL_WEIGHT: &str = "Weight";
const COL_WATER: &str = "Water";
const COL_READING: &str = "Reading";
const COL_PROTEIN: &str = "Protein";
const COL_TRAINING: &str = "Training";

/// Marker rows in the first column that carry no day data
const SKIPPED_MARKERS: [&str; 2] = ["BREAK", "NIGHTMARE"];
const SUMMARY_ROW: &str = "AVG OR SUM";

/// Parsed daily log
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub days: Vec<DailyMetrics>,
    pub skipped: usize,
}

/// Result of an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_imported: usize,
    pub rows_skipped: usize,
    pub weeks_updated: Vec<WeekKey>,
}

struct Columns(BTreeMap<String, usize>);

impl Columns {
    /// A missing column and a blank cell both read as `None`. Either way the
    /// day has no value for the metric and the weekly roll-up skips it.
    fn cell<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = *self.0.get(name)?;
        row.get(idx).map(|s| s.as_str())
    }

    fn number(&self, row: &[String], name: &str) -> Option<f64> {
        self.cell(row, name).and_then(parse_number)
    }

    fn flag(&self, row: &[String], name: &str) -> Option<bool> {
        self.cell(row, name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s == "1")
    }

    fn time(&self, row: &[String], name: &str) -> Option<String> {
        self.cell(row, name).and_then(normalize_time)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse `Mon, Apr 21` (year supplied) or `2025-04-21`
pub fn parse_log_date(raw: &str, default_year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    let month_day = match raw.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => raw,
    };
    NaiveDate::parse_from_str(&format!("{} {}", month_day, default_year), "%b %d %Y").ok()
}

/// Normalize `6:48 ` to `06:48`
pub fn normalize_time(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    match compact.split_once(':') {
        Some((hour, minute)) if hour.len() == 1 => Some(format!("0{}:{}", hour, minute)),
        _ => Some(compact),
    }
}

/// Parse the daily log CSV export.
///
/// The header row is the first row naming both `Date` and `Wake Time`; rows
/// above it are ignored. Marker rows, the summary row, rows without a date
/// and rows with no data are counted as skipped.
pub fn parse_daily_log(csv_text: &str, default_year: i32) -> Result<ParsedLog, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let header_idx = rows
        .iter()
        .position(|row| {
            row.len() > 2
                && row.iter().any(|c| c.trim() == COL_DATE)
                && row.iter().any(|c| c.trim() == COL_WAKE_TIME)
        })
        .ok_or(ImportError::MissingHeader)?;

    let columns = Columns(
        rows[header_idx]
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect(),
    );
    let date_idx = columns.0.get(COL_DATE).copied().unwrap_or(1);

    let mut parsed = ParsedLog::default();

    for row in &rows[header_idx + 1..] {
        let first = row.first().map(|s| s.trim()).unwrap_or("");
        let date_cell = row.get(date_idx).map(|s| s.trim()).unwrap_or("");

        if row.len() < 2
            || date_cell.is_empty()
            || SKIPPED_MARKERS.contains(&first)
            || date_cell == SUMMARY_ROW
        {
            parsed.skipped += 1;
            continue;
        }

        let Some(date) = parse_log_date(date_cell, default_year) else {
            parsed.skipped += 1;
            continue;
        };

        let has_data = row
            .iter()
            .enumerate()
            .any(|(idx, cell)| idx > date_idx && !cell.trim().is_empty());
        if !has_data {
            parsed.skipped += 1;
            continue;
        }

        parsed.days.push(DailyMetrics {
            hrv: columns.number(row, COL_HRV),
            calories: columns.number(row, COL_CALORIES),
            deep_work: columns.number(row, COL_DEEP_WORK),
            recovery: columns.number(row, COL_RECOVERY),
            sleep_time: columns.time(row, COL_SLEEP_TIME),
            cold_shower: columns.flag(row, COL_COLD_SHOWER),
            no_dopamine: columns.flag(row, COL_NO_DOPAMINE),
            sleep_hours: columns.number(row, COL_SLEEP_HOURS),
            waking_time: columns.time(row, COL_WAKE_TIME),
            daily_weight: columns.number(row, COL_WEIGHT),
            water_intake: columns.number(row, COL_WATER),
            reading_hours: columns.number(row, COL_READING),
            protein_intake: columns.number(row, COL_PROTEIN),
            jiu_jitsu_sessions: columns.number(row, COL_TRAINING),
            // Weightlifting is not tracked by the daily log
            ..DailyMetrics::new(date)
        });
    }

    Ok(parsed)
}

fn sum(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (total, count) = values.fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    (count > 0).then(|| total / count as f64)
}

fn count_true(values: impl Iterator<Item = bool>) -> Option<f64> {
    sum(values.map(|v| if v { 1.0 } else { 0.0 }))
}

/// Roll a week of daily metrics up into weekly KPI values.
///
/// A key is only produced when at least one day logged the metric.
pub fn rollup_week(days: &[DailyMetrics]) -> BTreeMap<String, f64> {
    let rollups = [
        (KPI_TRAINING, sum(days.iter().filter_map(|d| d.training_sessions()))),
        (KPI_DEEP_WORK, sum(days.iter().filter_map(|d| d.deep_work))),
        (KPI_READING, sum(days.iter().filter_map(|d| d.reading_hours))),
        (KPI_SLEEP, mean(days.iter().filter_map(|d| d.sleep_hours))),
        (KPI_COLD_SHOWER, count_true(days.iter().filter_map(|d| d.cold_shower))),
        (KPI_NO_DOPAMINE, count_true(days.iter().filter_map(|d| d.no_dopamine))),
        (KPI_PROTEIN, mean(days.iter().filter_map(|d| d.protein_intake))),
        (
            KPI_WEIGHT,
            sum(days.iter().filter_map(|d| d.daily_weight.map(|_| 1.0))),
        ),
    ];

    rollups
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}

/// Service importing the daily log
pub struct MetricsImportService<D, W>
where
    D: DailyMetricsRepository,
    W: WeeklyKpiRepository,
{
    daily: Arc<D>,
    weeks: Arc<W>,
    default_year: i32,
}

impl<D, W> MetricsImportService<D, W>
where
    D: DailyMetricsRepository,
    W: WeeklyKpiRepository,
{
    pub fn new(daily: Arc<D>, weeks: Arc<W>, default_year: i32) -> Self {
        Self {
            daily,
            weeks,
            default_year,
        }
    }

    /// Import a daily log export and refresh the touched weekly records
    pub async fn import_daily_log(
        &self,
        csv_text: &str,
        year: Option<i32>,
    ) -> Result<ImportSummary, AppError> {
        let parsed = parse_daily_log(csv_text, year.unwrap_or(self.default_year))?;

        self.daily.upsert_many(&parsed.days).await?;

        let touched: BTreeSet<WeekKey> = parsed.days.iter().map(|d| d.week_key()).collect();
        for week_key in &touched {
            let days = self
                .daily
                .find_between(week_key.start_date(), week_key.end_date())
                .await?;
            let values = rollup_week(&days);

            let mut record = self
                .weeks
                .find_by_week(week_key)
                .await?
                .unwrap_or_else(|| WeeklyKpiRecord::empty(*week_key));
            record.merge(&values);
            self.weeks.upsert(&record).await?;
        }

        tracing::info!(
            rows = parsed.days.len(),
            skipped = parsed.skipped,
            weeks = touched.len(),
            "Daily log imported"
        );

        Ok(ImportSummary {
            rows_imported: parsed.days.len(),
            rows_skipped: parsed.skipped,
            weeks_updated: touched.into_iter().collect(),
        })
    }
}
