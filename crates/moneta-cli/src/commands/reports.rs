//! Report command implementations

use anyhow::Result;
use moneta_core::db::Database;
use moneta_core::models::Status;
use moneta_core::narrative::format_amount;

pub fn cmd_report(db: &Database, user_id: i64, month: &str, json: bool) -> Result<()> {
    let report = db.monthly_report(user_id, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = &report.summary;
    let badge = match summary.status {
        Status::Green => "🟢",
        Status::Yellow => "🟡",
        Status::Red => "🔴",
    };

    println!();
    println!("📊 Monthly Report: {}", summary.month);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:   {:>14}", format_amount(summary.income));
    println!("   Expense:  {:>14}", format_amount(summary.expense));
    println!("   Net:      {:>14}", format_amount(summary.net));
    println!("   Status:   {} {}", badge, summary.status);
    println!("   Records:  {}", summary.count_records);

    if !summary.top_spend.is_empty() {
        println!();
        println!("   Top spending");
        for (i, spend) in summary.top_spend.iter().enumerate() {
            println!(
                "   {}. {:<20} {:>14}",
                i + 1,
                spend.category,
                format_amount(spend.amount)
            );
        }
    }

    println!();
    println!("   💬 {}", report.message);

    Ok(())
}
