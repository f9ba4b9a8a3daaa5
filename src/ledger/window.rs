use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Inclusive range of calendar dates a materialization run operates over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::InvalidInput(
                "window end must not precede start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`. Callers typically run the
    /// materializer over the current month's bounds.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap();
        let (year, month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };
        let end = NaiveDate::from_ymd_opt(year, month, 1).unwrap() - Duration::days(1);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(DateWindow::new(start, end).is_err());
        assert!(DateWindow::new(start, start).is_ok());
    }

    #[test]
    fn month_of_covers_whole_month_inclusive() {
        let window = DateWindow::month_of(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));

        let december = DateWindow::month_of(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(december.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
