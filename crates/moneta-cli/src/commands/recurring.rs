//! Recurring template command implementations

use anyhow::Result;
use moneta_core::db::Database;
use moneta_core::models::{NewRecurringTemplate, Schedule};

use super::{colored_amount, truncate};

pub fn cmd_recurring_list(db: &Database, user_id: i64) -> Result<()> {
    let templates = db.list_recurring(user_id)?;

    if templates.is_empty() {
        println!("No recurring templates. Add one with:");
        println!("  moneta recurring add --name Renta --amount -12000 --category Renta/Hipoteca --day 1");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring");
    println!("   ─────────────────────────────────────────────────────────────");
    for t in templates {
        let state = if t.active { "active" } else { "paused" };
        println!(
            "   {:>4} │ {:<24} │ {:>22} │ {:<16} │ day {:>2} │ {}",
            t.id,
            truncate(&t.name, 24),
            colored_amount(t.amount),
            truncate(&t.category, 16),
            t.day_of_month,
            state
        );
    }

    Ok(())
}

pub fn cmd_recurring_add(
    db: &Database,
    user_id: i64,
    name: &str,
    amount: f64,
    category: &str,
    day: u32,
    schedule: Schedule,
) -> Result<()> {
    let template = db.create_recurring(
        user_id,
        &NewRecurringTemplate {
            name: name.to_string(),
            amount,
            category: category.to_string(),
            schedule,
            day_of_month: day,
            active: true,
        },
    )?;

    println!(
        "✅ Recurring '{}' (id: {}) on day {} of each month",
        template.name, template.id, template.day_of_month
    );
    if template.day_of_month > 28 {
        println!("   Note: records are generated on day 28 at most");
    }

    Ok(())
}

pub fn cmd_recurring_generate(db: &Database, user_id: i64, month: &str) -> Result<()> {
    let created = db.generate_recurring(user_id, month)?;

    if created == 0 {
        println!("   Nothing to generate for {} (already up to date)", month);
    } else {
        println!("✅ Generated {} recurring records for {}", created, month);
    }

    Ok(())
}

pub fn cmd_recurring_set_active(
    db: &Database,
    user_id: i64,
    template_id: i64,
    active: bool,
) -> Result<()> {
    db.set_recurring_active(user_id, template_id, active)?;
    let verb = if active { "Resumed" } else { "Paused" };
    println!("✅ {} recurring template {}", verb, template_id);
    Ok(())
}
