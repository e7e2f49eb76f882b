//! Clock port
//!
//! Lets services ask for "today" without reading the system time directly.

use chrono::NaiveDate;

use crate::domain::entities::WeekKey;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// The ISO week containing today
    fn current_week(&self) -> WeekKey {
        WeekKey::from_date(self.today())
    }

    /// The most recently completed ISO week
    fn last_completed_week(&self) -> WeekKey {
        self.current_week().previous()
    }
}
