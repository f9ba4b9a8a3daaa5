//! JSON-file persistence for books.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::ledger::{Account, Book, LedgerTransaction, RecurringRule};
use crate::utils::app_data_dir;

use super::{LedgerStore, Result, RuleFilter};

const BOOK_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores one book as a pretty-printed JSON file, writing through an
/// in-memory copy that is flushed after every mutation.
pub struct JsonStore {
    path: PathBuf,
    book: Book,
}

impl JsonStore {
    /// Opens the named book under `base_dir`, creating an empty one if no
    /// file exists yet.
    pub fn open(base_dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        let path = book_path(base_dir, name);
        let book = if path.exists() {
            load_book_from_path(&path)?
        } else {
            let book = Book::new(name);
            save_book_to_path(&book, &path)?;
            book
        };
        Ok(Self { path, book })
    }

    /// Opens the named book under the per-user data directory.
    pub fn open_default(name: &str) -> Result<Self> {
        Self::open(&app_data_dir(), name)
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_account(&mut self, account: Account) -> Result<Uuid> {
        let id = self.book.add_account(account);
        self.flush()?;
        Ok(id)
    }

    pub fn add_rule(&mut self, rule: RecurringRule) -> Result<Uuid> {
        let id = self.book.add_rule(rule)?;
        self.flush()?;
        Ok(id)
    }

    fn flush(&self) -> Result<()> {
        save_book_to_path(&self.book, &self.path)
    }
}

impl LedgerStore for JsonStore {
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
        self.flush()
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
        self.flush()?;
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
        self.flush()
    }
}

/// Lists the book names stored under `base_dir`, newest first by file name.
pub fn list_books(base_dir: &Path) -> Result<Vec<String>> {
    if !base_dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(base_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Writes the book atomically by staging to a temporary file.
pub fn save_book_to_path(book: &Book, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a book snapshot from disk, returning structured errors on failure.
pub fn load_book_from_path(path: &Path) -> Result<Book> {
    if !path.exists() {
        return Err(EngineError::BookNotFound(path.display().to_string()));
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn book_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn canonical_name(name: &str) -> String {
    let mut canonical = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            canonical.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !canonical.is_empty() && !last_dash {
            canonical.push('-');
            last_dash = true;
        }
    }
    let trimmed = canonical.trim_matches('-');
    if trimmed.is_empty() {
        "book".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("My Budget 2025"), "my-budget-2025");
        assert_eq!(canonical_name("  ../../etc  "), "etc");
        assert_eq!(canonical_name("!!!"), "book");
    }
}
