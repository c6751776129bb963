use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeekError;

/// The date range a plan is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WeekError> {
        if end < start {
            return Err(WeekError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// The Monday to Sunday week that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Label used as the saved-menu key, e.g. "Week of Oct 6-12, 2025".
    pub fn label(&self) -> String {
        format!(
            "Week of {} {}-{}, {}",
            self.start.format("%b"),
            self.start.day(),
            self.end.day(),
            self.end.year()
        )
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
