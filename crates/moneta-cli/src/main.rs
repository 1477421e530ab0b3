//! Moneta CLI - Personal finance tracker
//!
//! Usage:
//!   moneta init                              Initialize database
//!   moneta users add ana@example.com         Register a user
//!   moneta --user ana@example.com add ...    Add a classified record
//!   moneta --user ana@example.com report 2026-01

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.rules.as_deref()),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add { email }) => commands::cmd_users_add(&db, &email),
                Some(UsersAction::Deactivate { email }) => {
                    commands::cmd_users_deactivate(&db, &email)
                }
            }
        }
        Commands::Classify {
            description,
            amount,
        } => {
            let classifier = commands::load_classifier(cli.rules.as_deref())?;
            let learned = match user {
                Some(email) => {
                    let db = commands::open_db(&cli.db)?;
                    let user = commands::resolve_user(&db, Some(email))?;
                    db.learned_rules(user.id)?
                }
                None => Vec::new(),
            };
            commands::cmd_classify(&classifier, &learned, &description, amount)
        }
        Commands::Add {
            date,
            description,
            amount,
            source,
        } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            let classifier = commands::load_classifier(cli.rules.as_deref())?;
            commands::cmd_add(&db, &classifier, user.id, &date, &description, amount, source)
        }
        Commands::Records { month, kind, json } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            commands::cmd_records_list(&db, user.id, &month, kind, json)
        }
        Commands::Correct { id, category } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            commands::cmd_correct(&db, user.id, id, &category)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            commands::cmd_delete(&db, user.id, id)
        }
        Commands::Rules { action } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            match action {
                None | Some(RulesAction::List) => commands::cmd_rules_list(&db, user.id),
                Some(RulesAction::Add { pattern, category }) => {
                    commands::cmd_rules_add(&db, user.id, &pattern, &category)
                }
                Some(RulesAction::Delete { id }) => commands::cmd_rules_delete(&db, user.id, id),
                Some(RulesAction::Test { description }) => {
                    commands::cmd_rules_test(&db, user.id, &description)
                }
            }
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            match action {
                None | Some(RecurringAction::List) => commands::cmd_recurring_list(&db, user.id),
                Some(RecurringAction::Add {
                    name,
                    amount,
                    category,
                    day,
                    schedule,
                }) => commands::cmd_recurring_add(
                    &db, user.id, &name, amount, &category, day, schedule,
                ),
                Some(RecurringAction::Generate { month }) => {
                    commands::cmd_recurring_generate(&db, user.id, &month)
                }
                Some(RecurringAction::Pause { id }) => {
                    commands::cmd_recurring_set_active(&db, user.id, id, false)
                }
                Some(RecurringAction::Resume { id }) => {
                    commands::cmd_recurring_set_active(&db, user.id, id, true)
                }
            }
        }
        Commands::Report { month, json } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, user)?;
            commands::cmd_report(&db, user.id, &month, json)
        }
    }
}
