//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_classifier` - Keyword rules from --rules, the data dir, or built-ins
//! - `resolve_user` - Map --user to an active user
//! - `cmd_init` and the `users` commands

use std::path::Path;

use anyhow::{Context, Result};
use moneta_core::classify::default_rules_path;
use moneta_core::db::Database;
use moneta_core::models::User;
use moneta_core::{Classifier, GlobalRules};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

pub fn load_classifier(rules_path: Option<&Path>) -> Result<Classifier> {
    let rules = GlobalRules::load(rules_path).context("Failed to load keyword rules")?;
    Ok(Classifier::new(rules))
}

pub fn resolve_user(db: &Database, email: Option<&str>) -> Result<User> {
    let email = email.context("No user given. Pass --user EMAIL or set MONETA_USER")?;
    db.get_user_by_email(email)?
        .ok_or_else(|| anyhow::anyhow!("User not found or inactive: {}", email))
}

pub fn cmd_init(db_path: &Path, rules_path: Option<&Path>) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;
    let classifier = load_classifier(rules_path)?;
    let rules = classifier.rules();

    let source = match rules_path.map(Path::to_path_buf).or_else(default_rules_path) {
        Some(path) if path.exists() => path.display().to_string(),
        _ => "built-in".to_string(),
    };
    println!(
        "   Keyword rules: {} ({} expense tiers, fallback '{}')",
        source,
        rules.expense.len(),
        rules.fallback.category
    );

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Register a user: moneta users add you@example.com");
    println!("  2. Add a record:    moneta --user you@example.com add --date 2026-01-05 --description \"UBER\" --amount -120");
    println!("  3. Monthly report:  moneta --user you@example.com report 2026-01");

    Ok(())
}

pub fn cmd_users_add(db: &Database, email: &str) -> Result<()> {
    let id = db.register_user(email)?;
    println!("✅ Registered {} (id: {})", email.trim().to_lowercase(), id);
    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Register one with:");
        println!("  moneta users add you@example.com");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────────────────────");
    for user in users {
        let state = if user.is_active { "" } else { " (inactive)" };
        println!(
            "   {:>4} │ {}{} │ since {}",
            user.id,
            user.email,
            state,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_users_deactivate(db: &Database, email: &str) -> Result<()> {
    db.deactivate_user(email)?;
    println!("✅ Deactivated {}", email);
    Ok(())
}
