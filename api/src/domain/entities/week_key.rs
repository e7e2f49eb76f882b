//! ISO week identifier
//!
//! Week keys use the `YYYY-Www` format (e.g. `2025-W07`). Ordering is numeric
//! on `(year, week)` rather than on the string form.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ISO 8601 calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

fn week_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-W(\d{2})$").expect("valid week key regex"))
}

impl WeekKey {
    /// Build a week key, rejecting weeks the ISO year does not have.
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Self { year, week })
    }

    /// The ISO week containing a date
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Monday of this week
    pub fn start_date(&self) -> NaiveDate {
        // Validated on construction
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// Sunday of this week
    pub fn end_date(&self) -> NaiveDate {
        self.start_date() + Duration::days(6)
    }

    /// The last second of the week (Sunday 23:59:59 UTC)
    pub fn closed_at(&self) -> DateTime<Utc> {
        let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        self.end_date().and_time(end).and_utc()
    }

    pub fn previous(&self) -> Self {
        Self::from_date(self.start_date() - Duration::days(7))
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl std::str::FromStr for WeekKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = week_key_regex()
            .captures(s.trim())
            .ok_or_else(|| format!("Invalid week key (expected YYYY-Www): {}", s))?;

        let year: i32 = caps[1]
            .parse()
            .map_err(|_| format!("Invalid year in week key: {}", s))?;
        let week: u32 = caps[2]
            .parse()
            .map_err(|_| format!("Invalid week in week key: {}", s))?;

        Self::new(year, week).ok_or_else(|| format!("Week {} does not exist in {}", week, year))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
