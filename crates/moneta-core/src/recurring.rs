//! Recurring transaction generation
//!
//! Turns active monthly templates into records for a target month. Generation is
//! idempotent: a draft is skipped when a recurring record with the same date,
//! description and amount already exists.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Record, RecordDraft, RecurringTemplate, Schedule, TransactionSource};

/// Prefix on descriptions of generated records
pub const RECURRING_PREFIX: &str = "[REC] ";

/// Latest day of month a template may land on (valid in every month)
pub const MAX_RECURRING_DAY: u32 = 28;

/// Parse a "YYYY-MM" month into (year, month)
pub fn parse_month(month: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidData(format!("Invalid month '{}' (use YYYY-MM)", month));

    let (year, mon) = month.split_once('-').ok_or_else(invalid)?;
    // Digits only: str::parse would also take a sign ("2026-+1")
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(year, 4) || !digits(mon, 2) {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&mon) {
        return Err(invalid());
    }
    Ok((year, mon))
}

/// Date a template falls on in `month`, with the day clamped to 1-28
pub fn recurring_date(month: &str, day_of_month: u32) -> Result<NaiveDate> {
    let (year, mon) = parse_month(month)?;
    let day = day_of_month.clamp(1, MAX_RECURRING_DAY);
    NaiveDate::from_ymd_opt(year, mon, day)
        .ok_or_else(|| Error::InvalidData(format!("Invalid date {}-{:02}", month, day)))
}

/// Description of a record generated from a template
pub fn recurring_description(name: &str) -> String {
    format!("{}{}", RECURRING_PREFIX, name)
}

fn is_duplicate(draft: &RecordDraft, date: NaiveDate, description: &str, amount: f64) -> bool {
    draft.date == date && draft.description == description && draft.amount == amount
}

/// Plan the records to create for `month`
///
/// `existing` should hold the user's records for the month; only those with a
/// recurring source count as duplicates. Drafts planned earlier in the same
/// call also count, so two identical templates produce a single record.
pub fn plan_month(
    templates: &[RecurringTemplate],
    month: &str,
    existing: &[Record],
) -> Result<Vec<RecordDraft>> {
    parse_month(month)?;
    let mut drafts: Vec<RecordDraft> = Vec::new();

    for template in templates
        .iter()
        .filter(|t| t.active && t.schedule == Schedule::Monthly)
    {
        let date = recurring_date(month, template.day_of_month)?;
        let description = recurring_description(&template.name);

        let exists = existing.iter().any(|r| {
            r.source == TransactionSource::Recurring
                && r.date == date
                && r.description == description
                && r.amount == template.amount
        }) || drafts
            .iter()
            .any(|d| is_duplicate(d, date, &description, template.amount));

        if exists {
            debug!("Recurring '{}' already present on {}", description, date);
            continue;
        }

        drafts.push(RecordDraft {
            date,
            description,
            amount: template.amount,
            category: template.category.clone(),
            confidence: 1.0,
            source: TransactionSource::Recurring,
        });
    }

    Ok(drafts)
}
