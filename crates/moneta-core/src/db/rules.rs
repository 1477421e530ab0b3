//! Learned rule operations

use rusqlite::{params, Connection, Row};
use tracing::info;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{LearnedRule, StoredRule};
use crate::rules::normalize_contains;

fn row_to_rule(row: &Row) -> rusqlite::Result<StoredRule> {
    Ok(StoredRule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pattern: row.get(2)?,
        category: row.get(3)?,
    })
}

/// Insert or overwrite a rule on an open connection (or transaction)
///
/// `pattern` must already be normalized. An existing rule keeps its ID, and so
/// its position in match order.
pub(crate) fn upsert_rule_on(
    conn: &Connection,
    user_id: i64,
    pattern: &str,
    category: &str,
) -> Result<StoredRule> {
    conn.execute(
        r#"
        INSERT INTO user_rules (user_id, contains, category)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id, contains) DO UPDATE SET category = excluded.category
        "#,
        params![user_id, pattern, category],
    )?;

    let rule = conn.query_row(
        "SELECT id, user_id, contains, category FROM user_rules WHERE user_id = ? AND contains = ?",
        params![user_id, pattern],
        row_to_rule,
    )?;
    Ok(rule)
}

pub(crate) fn learned_rules_on(conn: &Connection, user_id: i64) -> Result<Vec<LearnedRule>> {
    let mut stmt =
        conn.prepare("SELECT contains, category FROM user_rules WHERE user_id = ? ORDER BY id")?;
    let rules = stmt
        .query_map(params![user_id], |row| {
            Ok(LearnedRule {
                pattern: row.get(0)?,
                category: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rules)
}

impl Database {
    /// Create a rule, or overwrite the category of an existing pattern
    pub fn upsert_rule(&self, user_id: i64, contains: &str, category: &str) -> Result<StoredRule> {
        let pattern = normalize_contains(contains);
        let category = category.trim();
        if pattern.is_empty() {
            return Err(Error::InvalidData("Rule pattern is empty".to_string()));
        }
        if category.is_empty() {
            return Err(Error::InvalidData("Rule category is empty".to_string()));
        }

        let conn = self.conn()?;
        let rule = upsert_rule_on(&conn, user_id, &pattern, category)?;
        info!("Rule {} for user {}: '{}' => {}", rule.id, user_id, pattern, category);
        Ok(rule)
    }

    /// List a user's rules in insertion order
    pub fn list_rules(&self, user_id: i64) -> Result<Vec<StoredRule>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, contains, category FROM user_rules WHERE user_id = ? ORDER BY id",
        )?;
        let rules = stmt
            .query_map(params![user_id], row_to_rule)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    /// A user's rules as (pattern, category) pairs, in match order
    pub fn learned_rules(&self, user_id: i64) -> Result<Vec<LearnedRule>> {
        let conn = self.conn()?;
        learned_rules_on(&conn, user_id)
    }

    /// Delete one of a user's rules
    pub fn delete_rule(&self, user_id: i64, rule_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM user_rules WHERE id = ? AND user_id = ?",
            params![rule_id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Rule {}", rule_id)));
        }
        Ok(())
    }
}
