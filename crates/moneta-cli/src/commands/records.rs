//! Record command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use moneta_core::db::Database;
use moneta_core::models::{LearnedRule, NewRecord, Record, RecordKind, TransactionSource};
use moneta_core::Classifier;

use super::{colored_amount, truncate};

pub fn cmd_classify(
    classifier: &Classifier,
    learned: &[LearnedRule],
    description: &str,
    amount: f64,
) -> Result<()> {
    let result = classifier.classify(description, amount, learned);
    println!(
        "🏷️  {} → {} (confidence {:.2})",
        description, result.category, result.confidence
    );
    Ok(())
}

/// Classify and store one record, returning it as stored
pub fn add_record(
    db: &Database,
    classifier: &Classifier,
    user_id: i64,
    date: &str,
    description: &str,
    amount: f64,
    source: TransactionSource,
) -> Result<Record> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .context("Invalid --date format (use YYYY-MM-DD)")?;

    let record = NewRecord {
        date,
        description: description.to_string(),
        amount,
        source,
    };
    let ids = db.add_records(user_id, std::slice::from_ref(&record), classifier)?;
    let stored = ids
        .first()
        .map(|id| db.get_record(user_id, *id))
        .transpose()?
        .flatten()
        .context("Stored record could not be read back")?;
    Ok(stored)
}

pub fn cmd_add(
    db: &Database,
    classifier: &Classifier,
    user_id: i64,
    date: &str,
    description: &str,
    amount: f64,
    source: TransactionSource,
) -> Result<()> {
    let stored = add_record(db, classifier, user_id, date, description, amount, source)?;

    println!(
        "✅ Added record {}: {} {} → {} ({:.2})",
        stored.id,
        stored.date,
        truncate(&stored.description, 40),
        stored.category,
        stored.confidence
    );

    Ok(())
}

pub fn cmd_records_list(
    db: &Database,
    user_id: i64,
    month: &str,
    kind: RecordKind,
    json: bool,
) -> Result<()> {
    let records = db.list_records(user_id, month, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records for {}.", month);
        return Ok(());
    }

    println!();
    println!("📝 Records for {} ({})", month, kind.as_str());
    println!("   ─────────────────────────────────────────────────────────────");

    for record in &records {
        println!(
            "   {:>5} │ {} │ {:>22} │ {:<16} │ {:.2} │ {}",
            record.id,
            record.date,
            colored_amount(record.amount),
            truncate(&record.category, 16),
            record.confidence,
            truncate(&record.description, 36)
        );
    }
    println!();
    println!("   {} records", records.len());

    Ok(())
}

pub fn cmd_correct(db: &Database, user_id: i64, record_id: i64, category: &str) -> Result<()> {
    let result = db.correct_category(user_id, record_id, category)?;

    println!("✅ Record {} is now '{}'", result.record_id, result.category);
    match result.rule {
        Some(rule) => println!(
            "   Learned: descriptions containing \"{}\" → {}",
            rule.pattern, rule.category
        ),
        None => println!("   No rule learned (empty description)"),
    }

    Ok(())
}

pub fn cmd_delete(db: &Database, user_id: i64, record_id: i64) -> Result<()> {
    db.delete_record(user_id, record_id)?;
    println!("✅ Deleted record {}", record_id);
    Ok(())
}
