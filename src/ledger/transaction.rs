//! Materialized ledger entries emitted by the recurrence runner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::{EntryKind, RecurringRule};

/// A ledger entry created from one due occurrence of a recurring rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerTransaction {
    pub id: Uuid,
    /// Rule that produced this entry; together with `date` this forms the
    /// natural key stores deduplicate on.
    pub rule_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub owner: String,
    pub is_recurring: bool,
}

impl LedgerTransaction {
    /// Builds the entry for one occurrence of `rule` on `date`.
    pub fn from_occurrence(rule: &RecurringRule, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            rule_id: rule.id,
            date,
            description: format!("Recurrence: {}", rule.title),
            amount: rule.effective_amount(),
            kind: rule.kind,
            account_id: rule.account_id,
            category_id: rule.category_id,
            owner: rule.owner.clone(),
            is_recurring: true,
        }
    }

    /// Natural key identifying the occurrence this entry materializes.
    pub fn natural_key(&self) -> (Uuid, NaiveDate) {
        (self.rule_id, self.date)
    }
}
