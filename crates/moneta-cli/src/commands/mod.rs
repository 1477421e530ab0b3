//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - init, users and shared utilities (open_db, load_classifier, resolve_user)
//! - `records` - classify, add, list, correct, delete
//! - `recurring` - recurring template commands
//! - `reports` - monthly report
//! - `rules` - learned rule commands

pub mod core;
pub mod records;
pub mod recurring;
pub mod reports;
pub mod rules;

// Re-export command functions for main.rs
pub use self::core::*;
pub use records::*;
pub use recurring::*;
pub use reports::*;
pub use rules::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a signed amount with ANSI color (red expense, green income)
pub fn colored_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("\x1b[31m-${:.2}\x1b[0m", amount.abs())
    } else {
        format!("\x1b[32m+${:.2}\x1b[0m", amount)
    }
}
