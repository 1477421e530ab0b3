//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moneta_core::models::{RecordKind, Schedule, TransactionSource};

/// Moneta - Know where your month went
#[derive(Parser)]
#[command(name = "moneta")]
#[command(about = "Personal finance tracker with learned categories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "moneta.db", global = true)]
    pub db: PathBuf,

    /// Keyword rules file (TOML) replacing the built-in tiers
    #[arg(long, env = "MONETA_RULES", global = true)]
    pub rules: Option<PathBuf>,

    /// Email of the user to act as
    #[arg(long, env = "MONETA_USER", global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Classify a description without storing anything
    ///
    /// With --user, the user's learned rules are applied first.
    Classify {
        /// Transaction description
        description: String,

        /// Signed amount (negative = expense)
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Add a record (classified automatically)
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Description as shown on the statement
        #[arg(long)]
        description: String,

        /// Signed amount (negative = expense)
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// Record source: manual, recurring, import
        #[arg(long, default_value = "manual")]
        source: TransactionSource,
    },

    /// List a month's records
    Records {
        /// Month (YYYY-MM)
        month: String,

        /// Filter: all, income, expense
        #[arg(short, long, default_value = "all")]
        kind: RecordKind,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Correct a record's category and learn a rule from it
    Correct {
        /// Record ID
        id: i64,

        /// New category
        category: String,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: i64,
    },

    /// Manage learned rules
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },

    /// Manage recurring income and expenses
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Monthly summary with status and advice
    Report {
        /// Month (YYYY-MM)
        month: String,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a user
    Add {
        /// Email address
        email: String,
    },
    /// List users
    List,
    /// Deactivate a user
    Deactivate {
        /// Email address
        email: String,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List learned rules
    List,
    /// Add or overwrite a rule
    Add {
        /// Text the description must contain (case-insensitive)
        pattern: String,

        /// Category to assign
        category: String,
    },
    /// Delete a rule by ID
    Delete {
        /// Rule ID
        id: i64,
    },
    /// Show which rule (if any) matches a description
    Test {
        /// Description to test
        description: String,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring templates
    List,
    /// Add a recurring template
    Add {
        /// Template name (records are described as "[REC] <name>")
        #[arg(long)]
        name: String,

        /// Signed amount (negative = expense)
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// Category assigned to generated records
        #[arg(long)]
        category: String,

        /// Day of month (1-31, generated on day 28 at most)
        #[arg(long, default_value = "1")]
        day: u32,

        /// Schedule (only monthly is supported)
        #[arg(long, default_value = "monthly")]
        schedule: Schedule,
    },
    /// Generate a month's records from active templates
    Generate {
        /// Month (YYYY-MM)
        month: String,
    },
    /// Pause a template
    Pause {
        /// Template ID
        id: i64,
    },
    /// Resume a paused template
    Resume {
        /// Template ID
        id: i64,
    },
}
