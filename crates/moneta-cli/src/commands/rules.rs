//! Learned rule command implementations

use anyhow::Result;
use moneta_core::db::Database;
use moneta_core::match_user_rules;

use super::truncate;

pub fn cmd_rules_list(db: &Database, user_id: i64) -> Result<()> {
    let rules = db.list_rules(user_id)?;

    if rules.is_empty() {
        println!("No learned rules yet. Correct a record to teach one:");
        println!("  moneta correct <ID> <CATEGORY>");
        return Ok(());
    }

    println!();
    println!("📏 Learned Rules (checked in this order)");
    println!("   ─────────────────────────────────────────────────────────────");
    for rule in rules {
        println!(
            "   {:>4} │ {:<40} │ {}",
            rule.id,
            truncate(&rule.pattern, 40),
            rule.category
        );
    }

    Ok(())
}

pub fn cmd_rules_add(db: &Database, user_id: i64, pattern: &str, category: &str) -> Result<()> {
    let rule = db.upsert_rule(user_id, pattern, category)?;
    println!(
        "✅ Rule {}: \"{}\" → {}",
        rule.id, rule.pattern, rule.category
    );
    Ok(())
}

pub fn cmd_rules_delete(db: &Database, user_id: i64, rule_id: i64) -> Result<()> {
    db.delete_rule(user_id, rule_id)?;
    println!("✅ Deleted rule {}", rule_id);
    Ok(())
}

pub fn cmd_rules_test(db: &Database, user_id: i64, description: &str) -> Result<()> {
    let rules = db.learned_rules(user_id)?;

    match match_user_rules(description, &rules) {
        Some(category) => println!("✅ \"{}\" → {}", description, category),
        None => println!("   No learned rule matches \"{}\"", description),
    }

    Ok(())
}
