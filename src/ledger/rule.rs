//! Domain models for recurring rules and their cadence.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;

/// A template describing a recurring financial event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringRule {
    pub id: Uuid,
    /// Free-text label partitioning records by person, not an auth principal.
    pub owner: String,
    pub title: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub cadence: Cadence,
    /// First eligible occurrence date.
    pub start_date: NaiveDate,
    /// Inclusive upper bound; no occurrence after this date is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Watermark: date of the most recently materialized occurrence.
    #[serde(default)]
    pub last_run: Option<NaiveDate>,
    /// When present on a weekly rule, overrides `amount` at materialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RateOptions>,
}

impl RecurringRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        account_id: Uuid,
        category_id: Uuid,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            title: title.into(),
            amount,
            kind,
            account_id,
            category_id,
            cadence,
            start_date,
            end_date: None,
            last_run: None,
            rate: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_rate(mut self, rate: RateOptions) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Amount one materialized occurrence carries: the hourly-rate override
    /// applies to weekly rules only.
    pub fn effective_amount(&self) -> f64 {
        match (&self.cadence, &self.rate) {
            (Cadence::Weekly { .. }, Some(rate)) => rate.weekly_amount(),
            _ => self.amount,
        }
    }

    /// Checks the invariants enforced at rule-creation time.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Cadence::Monthly { day_of_month } = self.cadence {
            if !(1..=31).contains(&day_of_month) {
                return Err(EngineError::InvalidRuleShape(format!(
                    "day of month {} outside 1..=31",
                    day_of_month
                )));
            }
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(EngineError::InvalidRuleShape(
                    "end date precedes start date".into(),
                ));
            }
        }
        if let Some(last_run) = self.last_run {
            if last_run < self.start_date {
                return Err(EngineError::InvalidRuleShape(
                    "last run precedes start date".into(),
                ));
            }
            if self.end_date.map_or(false, |end| last_run > end) {
                return Err(EngineError::InvalidRuleShape(
                    "last run exceeds end date".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Cadence of a recurring rule. The schedule shape is tied to the frequency,
/// so mismatched combinations cannot be represented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Cadence {
    /// Fires on a fixed weekday every week.
    Weekly {
        #[serde(with = "weekday_index")]
        weekday: Weekday,
    },
    /// Fires every 14 days, anchored to the rule's start date.
    Biweekly,
    /// Fires on a fixed day of the month, clamped in short months.
    Monthly { day_of_month: u32 },
}

/// Persists weekdays as 0=Sunday indices.
mod weekday_index {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        weekday.num_days_from_sunday().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        match u32::deserialize(deserializer)? {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            other => Err(serde::de::Error::custom(format!(
                "weekday index {} outside 0..=6",
                other
            ))),
        }
    }
}

impl Cadence {
    pub fn label(&self) -> String {
        match self {
            Cadence::Weekly { weekday } => format!("Weekly ({})", weekday),
            Cadence::Biweekly => "Biweekly".into(),
            Cadence::Monthly { day_of_month } => format!("Monthly (day {})", day_of_month),
        }
    }
}

/// Whether the rule's entries add to or draw from the owner's funds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Hourly-rate override applied to weekly rules at materialization time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateOptions {
    pub hourly_rate: f64,
    pub hours_per_week: f64,
}

impl RateOptions {
    pub fn weekly_amount(&self) -> f64 {
        self.hourly_rate * self.hours_per_week
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_rule(cadence: Cadence) -> RecurringRule {
        RecurringRule::new(
            "ana",
            "Rent",
            850.0,
            EntryKind::Expense,
            Uuid::new_v4(),
            Uuid::new_v4(),
            cadence,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    }

    #[test]
    fn monthly_day_out_of_range_is_rejected() {
        let rule = base_rule(Cadence::Monthly { day_of_month: 32 });
        let err = rule.validate().expect_err("day 32 must be rejected");
        assert!(matches!(err, EngineError::InvalidRuleShape(_)));
    }

    #[test]
    fn watermark_outside_bounds_is_rejected() {
        let mut rule = base_rule(Cadence::Biweekly);
        rule.last_run = NaiveDate::from_ymd_opt(2024, 12, 1);
        assert!(rule.validate().is_err());

        rule.last_run = NaiveDate::from_ymd_opt(2025, 3, 1);
        rule.end_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn cadence_serializes_weekdays_as_sunday_based_indices() {
        let cadence = Cadence::Weekly {
            weekday: Weekday::Fri,
        };
        let json = serde_json::to_value(cadence).unwrap();
        assert_eq!(json["frequency"], "weekly");
        assert_eq!(json["weekday"], 5);

        let parsed: Cadence = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cadence);
        assert!(serde_json::from_str::<Cadence>(r#"{"frequency":"weekly","weekday":7}"#).is_err());
    }

    #[test]
    fn rate_override_applies_to_weekly_only() {
        let rate = RateOptions {
            hourly_rate: 20.0,
            hours_per_week: 10.0,
        };
        let weekly = base_rule(Cadence::Weekly {
            weekday: Weekday::Mon,
        })
        .with_rate(rate);
        assert_eq!(weekly.effective_amount(), 200.0);

        let monthly = base_rule(Cadence::Monthly { day_of_month: 5 }).with_rate(rate);
        assert_eq!(monthly.effective_amount(), 850.0);
    }
}
