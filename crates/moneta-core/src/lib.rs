//! Moneta Core Library
//!
//! Shared functionality for the Moneta personal finance tracker:
//! - Learned per-user rules and keyword-based transaction classification
//! - Monthly summaries with a red/yellow/green status and narrative
//! - Recurring income/expense generation
//! - SQLite ledger storage for users, records, rules and templates

pub mod classify;
pub mod db;
pub mod error;
pub mod models;
pub mod narrative;
pub mod recurring;
pub mod rules;
pub mod summary;

pub use classify::{classify, Classifier, GlobalRules};
pub use db::Database;
pub use error::{Error, Result};
pub use narrative::{explain, report};
pub use recurring::plan_month;
pub use rules::{match_user_rules, normalize_contains};
pub use summary::summarize;
