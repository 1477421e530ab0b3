//! Record operations

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::rules::{learned_rules_on, upsert_rule_on};
use super::{parse_date, parse_datetime, Database};
use crate::classify::{Classifier, LEARNED_CONFIDENCE};
use crate::error::{Error, Result};
use crate::models::{
    CorrectionResult, MonthlyReport, NewRecord, Record, RecordDraft, RecordKind, Transaction,
    TransactionSource,
};
use crate::narrative;
use crate::rules::normalize_contains;

const RECORD_COLUMNS: &str =
    "id, user_id, date, description, amount, category, confidence, source, created_at";

fn row_to_record(row: &Row) -> rusqlite::Result<Record> {
    let date: String = row.get(2)?;
    let source: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Record {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: parse_date(2, &date)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        category: row.get(5)?,
        confidence: row.get(6)?,
        source: source.parse().unwrap_or_default(),
        created_at: parse_datetime(&created_at),
    })
}

/// Records of a user whose date starts with `month`, ordered by (date, id)
pub(crate) fn month_records_on(
    conn: &Connection,
    user_id: i64,
    month: &str,
    kind: RecordKind,
) -> Result<Vec<Record>> {
    // substr() rather than LIKE so '%' and '_' in the month are literal
    let sql = format!(
        "SELECT {} FROM records WHERE user_id = ?1 AND substr(date, 1, length(?2)) = ?2 ORDER BY date, id",
        RECORD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map(params![user_id, month], row_to_record)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(records
        .into_iter()
        .filter(|r| kind.includes(r.amount))
        .collect())
}

pub(crate) fn insert_draft_on(conn: &Connection, user_id: i64, draft: &RecordDraft) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO records (user_id, date, description, amount, category, confidence, source)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            user_id,
            draft.date.to_string(),
            draft.description,
            draft.amount,
            draft.category,
            draft.confidence,
            draft.source.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Classify and store a batch of records
    ///
    /// Each record is classified against the user's learned rules, then the
    /// global keyword rules. The batch is stored atomically. Returns the new
    /// record IDs in input order.
    pub fn add_records(
        &self,
        user_id: i64,
        items: &[NewRecord],
        classifier: &Classifier,
    ) -> Result<Vec<i64>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let rules = learned_rules_on(&tx, user_id)?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let classification = classifier.classify(&item.description, item.amount, &rules);
            let draft = RecordDraft {
                date: item.date,
                description: item.description.clone(),
                amount: item.amount,
                category: classification.category,
                confidence: classification.confidence,
                source: item.source,
            };
            let id = insert_draft_on(&tx, user_id, &draft)?;
            debug!(
                "Record {} '{}' => {} ({:.2})",
                id, draft.description, draft.category, draft.confidence
            );
            ids.push(id);
        }

        tx.commit()?;
        info!("Added {} records for user {}", ids.len(), user_id);
        Ok(ids)
    }

    /// Get one of a user's records
    pub fn get_record(&self, user_id: i64, record_id: i64) -> Result<Option<Record>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM records WHERE id = ? AND user_id = ?",
            RECORD_COLUMNS
        );
        let record = conn
            .query_row(&sql, params![record_id, user_id], row_to_record)
            .optional()?;
        Ok(record)
    }

    /// List a user's records for a month ("YYYY-MM" prefix), ordered by date
    pub fn list_records(&self, user_id: i64, month: &str, kind: RecordKind) -> Result<Vec<Record>> {
        let conn = self.conn()?;
        month_records_on(&conn, user_id, month, kind)
    }

    /// Correct a record's category and learn from it
    ///
    /// Sets the category with full confidence and, in the same SQL transaction,
    /// writes a learned rule mapping the record's normalized description to the
    /// new category (overwriting an existing rule for that pattern).
    pub fn correct_category(
        &self,
        user_id: i64,
        record_id: i64,
        category: &str,
    ) -> Result<CorrectionResult> {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::InvalidData("Category is empty".to_string()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let description: String = tx
            .query_row(
                "SELECT description FROM records WHERE id = ? AND user_id = ?",
                params![record_id, user_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Record {}", record_id)))?;

        tx.execute(
            "UPDATE records SET category = ?, confidence = ? WHERE id = ?",
            params![category, LEARNED_CONFIDENCE, record_id],
        )?;

        let pattern = normalize_contains(&description);
        let rule = if pattern.is_empty() {
            None
        } else {
            Some(upsert_rule_on(&tx, user_id, &pattern, category)?.learned())
        };

        tx.commit()?;
        info!(
            "Record {} corrected to {} (learned: {})",
            record_id,
            category,
            rule.is_some()
        );

        Ok(CorrectionResult {
            record_id,
            category: category.to_string(),
            rule,
        })
    }

    /// Delete one of a user's records
    pub fn delete_record(&self, user_id: i64, record_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE id = ? AND user_id = ?",
            params![record_id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Record {}", record_id)));
        }
        Ok(())
    }

    /// Count a user's records by source
    pub fn count_records(&self, user_id: i64, source: TransactionSource) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE user_id = ? AND source = ?",
            params![user_id, source.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// A user's month as aggregator input
    pub fn month_transactions(&self, user_id: i64, month: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .list_records(user_id, month, RecordKind::All)?
            .iter()
            .map(Record::transaction)
            .collect())
    }

    /// Summarize a user's month and explain it
    pub fn monthly_report(&self, user_id: i64, month: &str) -> Result<MonthlyReport> {
        let transactions = self.month_transactions(user_id, month)?;
        Ok(narrative::report(&transactions, month))
    }
}
