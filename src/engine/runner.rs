//! Materializes due occurrences of recurring rules into ledger transactions.

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::EngineError;
use crate::ledger::{DateWindow, LedgerTransaction, RecurringRule};
use crate::storage::{LedgerStore, RuleFilter};

use super::occurrence::{next_occurrence, next_occurrence_after};

/// Summary of one materialization run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Transactions newly created across all rules.
    pub created: usize,
    pub outcomes: Vec<RuleOutcome>,
}

/// Per-rule result of a materialization run.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub rule_id: Uuid,
    pub title: String,
    pub created: usize,
    /// Set when the rule stopped early on a persistence failure; the
    /// occurrences already materialized stand.
    pub halted: Option<EngineError>,
}

/// Materializes every due occurrence inside `window` for the rules matched
/// by `filter`. A persistence failure stops only the affected rule; the
/// remaining rules still run. Re-running the same window is a no-op for
/// rules whose watermark already covers it.
pub fn run_due(
    store: &mut dyn LedgerStore,
    filter: &RuleFilter,
    window: DateWindow,
) -> Result<RunReport, EngineError> {
    let rules = store.list_rules(filter)?;
    let mut report = RunReport::default();
    for rule in &rules {
        let outcome = run_rule(store, rule, window);
        report.created += outcome.created;
        report.outcomes.push(outcome);
    }
    info!(
        created = report.created,
        rules = report.outcomes.len(),
        "materialization run finished"
    );
    Ok(report)
}

fn run_rule(store: &mut dyn LedgerStore, rule: &RecurringRule, window: DateWindow) -> RuleOutcome {
    let mut outcome = RuleOutcome {
        rule_id: rule.id,
        title: rule.title.clone(),
        created: 0,
        halted: None,
    };
    // Seed strictly past the watermark when one exists; a fresh rule starts
    // inclusively from its start date.
    let mut cursor = match rule.last_run {
        Some(watermark) => next_occurrence_after(rule, watermark),
        None => next_occurrence(rule, rule.start_date),
    };
    while let Some(date) = cursor {
        if !window.contains(date) {
            break;
        }
        if rule.last_run.map_or(false, |watermark| date <= watermark) {
            break;
        }
        match materialize_occurrence(store, rule, date) {
            Ok(inserted) => {
                if inserted {
                    outcome.created += 1;
                }
            }
            Err(err) => {
                warn!(rule = %rule.id, %date, error = %err, "stopping rule after persistence failure");
                outcome.halted = Some(err);
                break;
            }
        }
        cursor = next_occurrence_after(rule, date);
    }
    outcome
}

/// Persists one occurrence: transaction insert (idempotent on the
/// `(rule, date)` natural key), then the watermark, then the balance delta.
/// A replayed insert advances the watermark but leaves the balance alone.
fn materialize_occurrence(
    store: &mut dyn LedgerStore,
    rule: &RecurringRule,
    date: NaiveDate,
) -> Result<bool, EngineError> {
    let entry = LedgerTransaction::from_occurrence(rule, date);
    let amount = entry.amount;
    let inserted = store.insert_transaction(entry)?;
    store.update_rule_watermark(rule.id, date)?;
    if inserted {
        let account = store.account(rule.account_id)?;
        store.update_account_balance(rule.account_id, account.balance + amount)?;
        debug!(rule = %rule.id, %date, amount, "materialized occurrence");
    } else {
        debug!(rule = %rule.id, %date, "occurrence already present, watermark advanced");
    }
    Ok(inserted)
}
