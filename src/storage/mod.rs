//! Persistence traits and book validation helpers.

pub mod json_backend;
pub mod memory;

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::ledger::{Account, Book, LedgerTransaction, RecurringRule};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Selects the rules a materialization run operates over. Passed explicitly
/// so callers carry no ambient filter state.
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    /// Restrict to rules whose owner label matches exactly.
    pub owner: Option<String>,
}

impl RuleFilter {
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
        }
    }

    pub fn matches(&self, rule: &RecurringRule) -> bool {
        self.owner
            .as_deref()
            .map_or(true, |owner| rule.owner == owner)
    }
}

/// Abstraction over persistence backends the recurrence engine writes through.
pub trait LedgerStore: Send + Sync {
    fn list_rules(&self, filter: &RuleFilter) -> Result<Vec<RecurringRule>>;

    /// Advances the rule's last-run watermark.
    fn update_rule_watermark(&mut self, rule_id: Uuid, date: NaiveDate) -> Result<()>;

    /// Inserts a materialized transaction. Returns `false` when an entry with
    /// the same `(rule, date)` natural key already exists.
    fn insert_transaction(&mut self, entry: LedgerTransaction) -> Result<bool>;

    fn account(&self, account_id: Uuid) -> Result<Account>;

    fn update_account_balance(&mut self, account_id: Uuid, balance: f64) -> Result<()>;
}

/// Detects dangling references and malformed rules within a book snapshot.
pub fn book_warnings(book: &Book) -> Vec<String> {
    let account_ids: HashSet<_> = book.accounts.iter().map(|a| a.id).collect();
    let category_ids: HashSet<_> = book.categories.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for rule in &book.rules {
        if !account_ids.contains(&rule.account_id) {
            warnings.push(format!(
                "rule {} references unknown account {}",
                rule.id, rule.account_id
            ));
        }
        if !category_ids.contains(&rule.category_id) {
            warnings.push(format!(
                "rule {} references missing category {}",
                rule.id, rule.category_id
            ));
        }
        if let Err(err) = rule.validate() {
            warnings.push(format!("rule {}: {}", rule.id, err));
        }
    }
    for txn in &book.transactions {
        if !account_ids.contains(&txn.account_id) {
            warnings.push(format!(
                "transaction {} references unknown account {}",
                txn.id, txn.account_id
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Cadence, EntryKind};

    #[test]
    fn warnings_flag_dangling_rule_references() {
        let mut book = Book::new("Audit");
        let rule = RecurringRule::new(
            "ana",
            "Rent",
            850.0,
            EntryKind::Expense,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Cadence::Monthly { day_of_month: 1 },
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        book.add_rule(rule).unwrap();

        let warnings = book_warnings(&book);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown account"));
        assert!(warnings[1].contains("missing category"));
    }
}
