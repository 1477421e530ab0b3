//! Recurring template operations

use rusqlite::{params, Connection, Row};
use tracing::info;

use super::records::{insert_draft_on, month_records_on};
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewRecurringTemplate, RecordKind, RecurringTemplate, Schedule};
use crate::recurring::{parse_month, plan_month};

const TEMPLATE_COLUMNS: &str =
    "id, user_id, name, amount, category, schedule, day_of_month, active, created_at";

fn row_to_template(row: &Row) -> rusqlite::Result<RecurringTemplate> {
    let schedule: String = row.get(5)?;
    let created_at: String = row.get(8)?;

    Ok(RecurringTemplate {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        schedule: schedule.parse().unwrap_or_default(),
        day_of_month: row.get(6)?,
        active: row.get(7)?,
        created_at: parse_datetime(&created_at),
    })
}

fn templates_on(conn: &Connection, user_id: i64) -> Result<Vec<RecurringTemplate>> {
    let sql = format!(
        "SELECT {} FROM recurring_rules WHERE user_id = ? ORDER BY id",
        TEMPLATE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let templates = stmt
        .query_map(params![user_id], row_to_template)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(templates)
}

impl Database {
    /// Create a recurring template
    ///
    /// Only monthly schedules are supported. The day of month is stored as
    /// given (1-31) and clamped to 28 when records are generated.
    pub fn create_recurring(
        &self,
        user_id: i64,
        template: &NewRecurringTemplate,
    ) -> Result<RecurringTemplate> {
        if template.schedule != Schedule::Monthly {
            return Err(Error::InvalidData(format!(
                "Unsupported schedule '{}': only 'monthly' is supported",
                template.schedule
            )));
        }
        let name = template.name.trim();
        let category = template.category.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Recurring name is empty".to_string()));
        }
        if category.is_empty() {
            return Err(Error::InvalidData("Recurring category is empty".to_string()));
        }
        if !(1..=31).contains(&template.day_of_month) {
            return Err(Error::InvalidData(format!(
                "Day of month {} is outside 1-31",
                template.day_of_month
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO recurring_rules (user_id, name, amount, category, schedule, day_of_month, active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                name,
                template.amount,
                category,
                template.schedule.as_str(),
                template.day_of_month,
                template.active,
            ],
        )?;
        let id = conn.last_insert_rowid();

        let sql = format!("SELECT {} FROM recurring_rules WHERE id = ?", TEMPLATE_COLUMNS);
        let created = conn.query_row(&sql, params![id], row_to_template)?;
        info!("Recurring template {} '{}' for user {}", id, name, user_id);
        Ok(created)
    }

    /// List a user's recurring templates in creation order
    pub fn list_recurring(&self, user_id: i64) -> Result<Vec<RecurringTemplate>> {
        let conn = self.conn()?;
        templates_on(&conn, user_id)
    }

    /// Pause or resume a template
    pub fn set_recurring_active(&self, user_id: i64, template_id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_rules SET active = ? WHERE id = ? AND user_id = ?",
            params![active, template_id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Recurring template {}", template_id)));
        }
        Ok(())
    }

    /// Generate a month's records from the user's active monthly templates
    ///
    /// Idempotent: records already generated for the month are not duplicated.
    /// Returns the number of records created.
    pub fn generate_recurring(&self, user_id: i64, month: &str) -> Result<usize> {
        parse_month(month)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let templates = templates_on(&tx, user_id)?;
        let existing = month_records_on(&tx, user_id, month, RecordKind::All)?;
        let drafts = plan_month(&templates, month, &existing)?;

        for draft in &drafts {
            insert_draft_on(&tx, user_id, draft)?;
        }
        tx.commit()?;

        info!(
            "Generated {} recurring records for user {} in {}",
            drafts.len(),
            user_id,
            month
        );
        Ok(drafts.len())
    }
}
