//! In-memory store used by tests and single-session callers.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::ledger::{Account, Book, LedgerTransaction, RecurringRule};

use super::{LedgerStore, Result, RuleFilter};

/// Holds a [`Book`] entirely in memory.
#[derive(Debug)]
pub struct MemoryStore {
    book: Book,
}

impl MemoryStore {
    pub fn new(book: Book) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn into_book(self) -> Book {
        self.book
    }
}

impl LedgerStore for MemoryStore {
    fn list_rules(&self, filter: &RuleFilter) -> Result<Vec<RecurringRule>> {
        Ok(self
            .book
            .rules
            .iter()
            .filter(|rule| filter.matches(rule))
            .cloned()
            .collect())
    }

    fn update_rule_watermark(&mut self, rule_id: Uuid, date: NaiveDate) -> Result<()> {
        let rule = self
            .book
            .rule_mut(rule_id)
            .ok_or(EngineError::RuleNotFound(rule_id))?;
        rule.last_run = Some(date);
        self.book.touch();
        Ok(())
    }

    fn insert_transaction(&mut self, entry: LedgerTransaction) -> Result<bool> {
        let duplicate = self
            .book
            .transactions
            .iter()
            .any(|txn| txn.natural_key() == entry.natural_key());
        if duplicate {
            return Ok(false);
        }
        self.book.transactions.push(entry);
        self.book.touch();
        Ok(true)
    }

    fn account(&self, account_id: Uuid) -> Result<Account> {
        self.book
            .account(account_id)
            .cloned()
            .ok_or(EngineError::AccountNotFound(account_id))
    }

    fn update_account_balance(&mut self, account_id: Uuid, balance: f64) -> Result<()> {
        let account = self
            .book
            .account_mut(account_id)
            .ok_or(EngineError::AccountNotFound(account_id))?;
        account.balance = balance;
        self.book.touch();
        Ok(())
    }
}
