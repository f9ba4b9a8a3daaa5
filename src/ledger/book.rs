use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;

use super::{
    account::Account, category::Category, rule::RecurringRule, transaction::LedgerTransaction,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Serializable container for one data set: accounts, categories, recurring
/// rules, and the transactions materialized from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub rules: Vec<RecurringRule>,
    #[serde(default)]
    pub transactions: Vec<LedgerTransaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            categories: Vec::new(),
            rules: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    /// Adds a rule after checking its shape invariants. Malformed rules are
    /// rejected here, at creation time, rather than during materialization.
    pub fn add_rule(&mut self, rule: RecurringRule) -> Result<Uuid, EngineError> {
        rule.validate()?;
        let id = rule.id;
        self.rules.push(rule);
        self.touch();
        Ok(id)
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn rule(&self, id: Uuid) -> Option<&RecurringRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn rule_mut(&mut self, id: Uuid) -> Option<&mut RecurringRule> {
        self.rules.iter_mut().find(|rule| rule.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::category::CategoryKind;
    use crate::ledger::rule::{Cadence, EntryKind};
    use chrono::NaiveDate;

    #[test]
    fn add_rule_rejects_malformed_shapes() {
        let mut book = Book::new("Test");
        let account = book.add_account(Account::new("Checking", "ana"));
        let category = book.add_category(Category::new("Housing", CategoryKind::Expense));

        let rule = RecurringRule::new(
            "ana",
            "Rent",
            850.0,
            EntryKind::Expense,
            account,
            category,
            Cadence::Monthly { day_of_month: 0 },
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(book.add_rule(rule).is_err());
        assert!(book.rules.is_empty());
    }
}
