//! Daily metrics domain entity
//!
//! One row per logged day from the daily log spreadsheet. Every field is
//! optional because the log is filled in sparsely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::week_key::WeekKey;

/// Metrics logged for a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    #[serde(skip)]
    pub date: NaiveDate,
    pub hrv: Option<f64>,
    pub calories: Option<f64>,
    pub deep_work: Option<f64>,
    pub recovery: Option<f64>,
    /// Bedtime, `HH:MM`
    pub sleep_time: Option<String>,
    pub cold_shower: Option<bool>,
    pub no_dopamine: Option<bool>,
    pub sleep_hours: Option<f64>,
    /// Wake-up time, `HH:MM`
    pub waking_time: Option<String>,
    pub daily_weight: Option<f64>,
    pub water_intake: Option<f64>,
    pub reading_hours: Option<f64>,
    pub protein_intake: Option<f64>,
    pub jiu_jitsu_sessions: Option<f64>,
    pub weightlifting_sessions: Option<f64>,
}

impl DailyMetrics {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    pub fn week_key(&self) -> WeekKey {
        WeekKey::from_date(self.date)
    }

    /// Training sessions of any kind logged that day
    pub fn training_sessions(&self) -> Option<f64> {
        match (self.jiu_jitsu_sessions, self.weightlifting_sessions) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
        }
    }
}
