//! System clock adapter

use chrono::{NaiveDate, Utc};

use crate::domain::ports::Clock;

/// Clock reading the current UTC date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
