//! Monthly aggregation
//!
//! Sums a month of transactions into income, expense and net, ranks the
//! largest spending categories and derives a red/yellow/green status.

use std::cmp::Ordering;

use crate::models::{CategorySpend, MonthlySummary, Status, Transaction};

/// Number of spending categories kept in a summary
pub const TOP_SPEND_LIMIT: usize = 5;

/// Margin below which a positive month is only "yellow", as a share of income
const THIN_MARGIN_RATIO: f64 = 0.05;

/// Minimum absolute margin for "green"
const MIN_MARGIN: f64 = 1.0;

/// Round to 2 decimals, exact ties to the even cent
pub fn round2(value: f64) -> f64 {
    // Adding 0.0 turns -0.0 into 0.0
    (value * 100.0).round_ties_even() / 100.0 + 0.0
}

/// Whether a transaction falls in a month, by "YYYY-MM" prefix of its date
///
/// Any prefix works ("2026" matches the whole year); a malformed month simply
/// matches nothing.
pub fn in_month(transaction: &Transaction, month: &str) -> bool {
    transaction.date.to_string().starts_with(month)
}

/// Derive the traffic-light status from unrounded totals
pub fn status_for(income: f64, expense: f64) -> Status {
    let net = income - expense;

    if income <= 0.0 && expense > 0.0 {
        // Only spending, no income signal at all
        Status::Red
    } else if net < 0.0 {
        Status::Red
    } else if net < MIN_MARGIN.max(income * THIN_MARGIN_RATIO) {
        Status::Yellow
    } else {
        Status::Green
    }
}

/// Summarize the transactions that fall in `month`
pub fn summarize(transactions: &[Transaction], month: &str) -> MonthlySummary {
    let month_txs: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| in_month(t, month))
        .collect();

    let income: f64 = month_txs
        .iter()
        .filter(|t| t.amount > 0.0)
        .map(|t| t.amount)
        .sum();
    let expense: f64 = month_txs
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| -t.amount)
        .sum();
    let net = income - expense;

    MonthlySummary {
        month: month.to_string(),
        income: round2(income),
        expense: round2(expense),
        net: round2(net),
        status: status_for(income, expense),
        top_spend: top_spend(&month_txs),
        count_records: month_txs.len(),
    }
}

/// Expense per category, largest first, ties in first-seen order
fn top_spend(transactions: &[&Transaction]) -> Vec<CategorySpend> {
    // Insertion-ordered accumulation keeps the sort below stable on ties
    let mut by_category: Vec<(&str, f64)> = Vec::new();
    for t in transactions.iter().filter(|t| t.amount < 0.0) {
        match by_category.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, total)) => *total += -t.amount,
            None => by_category.push((t.category.as_str(), -t.amount)),
        }
    }

    by_category.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    by_category
        .into_iter()
        .take(TOP_SPEND_LIMIT)
        .map(|(category, amount)| CategorySpend {
            category: category.to_string(),
            amount: round2(amount),
        })
        .collect()
}
