//! Ledger domain models: rules, accounts, materialized transactions.

pub mod account;
pub mod book;
pub mod category;
pub mod rule;
pub mod transaction;
pub mod window;

pub use account::Account;
pub use book::Book;
pub use category::{Category, CategoryKind};
pub use rule::{Cadence, EntryKind, RateOptions, RecurringRule};
pub use transaction::LedgerTransaction;
pub use window::DateWindow;
