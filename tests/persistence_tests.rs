mod common;

use chrono::{NaiveDate, Weekday};
use serde_json::Value;

use recur_core::config::{Config, ConfigManager};
use recur_core::engine::run_due;
use recur_core::errors::EngineError;
use recur_core::ledger::{Account, Cadence, EntryKind, RecurringRule, DateWindow};
use recur_core::storage::json_backend::{list_books, load_book_from_path};
use recur_core::storage::{JsonStore, RuleFilter};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn sample_rule(account: uuid::Uuid, cadence: Cadence, start: NaiveDate) -> RecurringRule {
    RecurringRule::new(
        "ana",
        "Internet",
        45.0,
        EntryKind::Expense,
        account,
        uuid::Uuid::new_v4(),
        cadence,
        start,
    )
}

#[test]
fn books_round_trip_through_json_with_every_cadence() {
    let base = common::temp_base_dir();
    let mut store = JsonStore::open(&base, "Household").unwrap();
    let account = store.add_account(Account::new("Checking", "ana")).unwrap();
    store
        .add_rule(sample_rule(
            account,
            Cadence::Weekly {
                weekday: Weekday::Thu,
            },
            date(2025, 1, 2),
        ))
        .unwrap();
    store
        .add_rule(sample_rule(account, Cadence::Biweekly, date(2025, 1, 2)))
        .unwrap();
    store
        .add_rule(sample_rule(
            account,
            Cadence::Monthly { day_of_month: 31 },
            date(2025, 1, 31),
        ))
        .unwrap();
    let saved = serde_json::to_value(store.book()).unwrap();
    let path = store.path().to_path_buf();
    drop(store);

    let reopened = JsonStore::open(&base, "Household").unwrap();
    let loaded: Value = serde_json::to_value(reopened.book()).unwrap();
    assert_eq!(saved, loaded);
    assert_eq!(reopened.book().rules.len(), 3);

    let direct = load_book_from_path(&path).unwrap();
    assert_eq!(direct.rules.len(), 3);
}

#[test]
fn a_run_survives_reopening_the_store() {
    let base = common::temp_base_dir();
    let mut store = JsonStore::open(&base, "Payroll").unwrap();
    let account = store.add_account(Account::new("Checking", "ana")).unwrap();
    store
        .add_rule(sample_rule(
            account,
            Cadence::Monthly { day_of_month: 15 },
            date(2025, 1, 15),
        ))
        .unwrap();

    let window = DateWindow::month_of(date(2025, 1, 1));
    let report = run_due(&mut store, &RuleFilter::default(), window).unwrap();
    assert_eq!(report.created, 1);
    drop(store);

    let mut reopened = JsonStore::open(&base, "Payroll").unwrap();
    assert_eq!(reopened.book().transactions.len(), 1);
    assert_eq!(reopened.book().rules[0].last_run, Some(date(2025, 1, 15)));
    assert_eq!(reopened.book().account(account).unwrap().balance, 45.0);

    // Idempotence holds across processes, not just in memory.
    let second = run_due(&mut reopened, &RuleFilter::default(), window).unwrap();
    assert_eq!(second.created, 0);
}

#[test]
fn saves_are_staged_and_leave_no_temp_files() {
    let base = common::temp_base_dir();
    let mut store = JsonStore::open(&base, "Atomic").unwrap();
    store.add_account(Account::new("Checking", "ana")).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(&base)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| ext == "tmp")
        })
        .collect();
    assert!(leftovers.is_empty());
    assert!(store.path().exists());
}

#[test]
fn list_books_reports_saved_names() {
    let base = common::temp_base_dir();
    JsonStore::open(&base, "Household Budget").unwrap();
    JsonStore::open(&base, "Payroll").unwrap();

    let names = list_books(&base).unwrap();
    assert_eq!(names, vec!["household-budget".to_string(), "payroll".to_string()]);
}

#[test]
fn loading_a_missing_book_is_a_structured_error() {
    let base = common::temp_base_dir();
    let err = load_book_from_path(&base.join("nope.json")).expect_err("missing file");
    assert!(matches!(err, EngineError::BookNotFound(_)));
}

#[test]
fn config_round_trips_and_defaults_when_absent() {
    let base = common::temp_base_dir();
    let manager = ConfigManager::with_base_dir(base).unwrap();

    let config = manager.load().unwrap();
    assert_eq!(config.default_owner, "me");
    assert_eq!(config.currency, "USD");

    let updated = Config {
        default_owner: "ana".into(),
        currency: "EUR".into(),
        last_opened_book: Some("household-budget".into()),
    };
    manager.save(&updated).unwrap();

    let reloaded = manager.load().unwrap();
    assert_eq!(reloaded.default_owner, "ana");
    assert_eq!(reloaded.currency, "EUR");
    assert_eq!(reloaded.last_opened_book.as_deref(), Some("household-budget"));
    assert!(manager.path().exists());
}
