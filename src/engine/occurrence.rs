//! Next-occurrence date math for recurring rules.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::ledger::{Cadence, DateWindow, RecurringRule};

const BIWEEKLY_STEP_DAYS: i64 = 14;

/// Returns the earliest occurrence of `rule` on or after `from`, or `None`
/// once the rule's end date rules out any further occurrence.
pub fn next_occurrence(rule: &RecurringRule, from: NaiveDate) -> Option<NaiveDate> {
    if let Some(end) = rule.end_date {
        if end < from {
            return None;
        }
    }
    let from = from.max(rule.start_date);
    let candidate = match rule.cadence {
        Cadence::Weekly { weekday } => next_weekday_on_or_after(from, weekday),
        Cadence::Biweekly => next_biweekly(rule.start_date, from),
        Cadence::Monthly { day_of_month } => next_monthly(from, day_of_month)?,
    };
    match rule.end_date {
        Some(end) if candidate > end => None,
        _ => Some(candidate),
    }
}

/// Returns the earliest occurrence strictly after `from`. The runner chains
/// this variant so successive cursors always move forward.
pub fn next_occurrence_after(rule: &RecurringRule, from: NaiveDate) -> Option<NaiveDate> {
    next_occurrence(rule, from.succ_opt()?)
}

/// Projects the occurrence dates of `rule` inside `window` without touching
/// the watermark. Useful for upcoming-payment views.
pub fn upcoming_occurrences(rule: &RecurringRule, window: DateWindow) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut cursor = next_occurrence(rule, window.start);
    while let Some(date) = cursor {
        if date > window.end {
            break;
        }
        dates.push(date);
        cursor = next_occurrence_after(rule, date);
    }
    dates
}

fn next_weekday_on_or_after(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let mut date = from;
    while date.weekday() != weekday {
        date = date + Duration::days(1);
    }
    date
}

fn next_biweekly(start: NaiveDate, from: NaiveDate) -> NaiveDate {
    if from <= start {
        return start;
    }
    let elapsed = (from - start).num_days();
    let mut date = start + Duration::days((elapsed / BIWEEKLY_STEP_DAYS) * BIWEEKLY_STEP_DAYS);
    while date < from {
        date = date + Duration::days(BIWEEKLY_STEP_DAYS);
    }
    date
}

fn next_monthly(from: NaiveDate, day_of_month: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day_of_month) {
        // Malformed rules yield no occurrence rather than a panic.
        return None;
    }
    let candidate = clamped_date(from.year(), from.month(), day_of_month);
    if candidate >= from {
        return Some(candidate);
    }
    let (year, month) = if from.month() == 12 {
        (from.year() + 1, 1)
    } else {
        (from.year(), from.month() + 1)
    };
    Some(clamped_date(year, month, day_of_month))
}

/// Builds a date in `year`/`month`, clamping `day` to that month's length.
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn clamped_date_uses_computed_month_length() {
        assert_eq!(
            clamped_date(2024, 2, 31),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            clamped_date(2025, 4, 31),
            NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
        );
    }
}
