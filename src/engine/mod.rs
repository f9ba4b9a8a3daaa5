//! Next-occurrence date math and the due-occurrence materialization runner.

pub mod occurrence;
pub mod runner;

pub use occurrence::{next_occurrence, next_occurrence_after, upcoming_occurrences};
pub use runner::{run_due, RuleOutcome, RunReport};
