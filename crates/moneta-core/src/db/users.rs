//! User operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        is_active: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Normalize an email for storage and lookup
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Database {
    /// Register a new user, returning its ID
    pub fn register_user(&self, email: &str) -> Result<i64> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(Error::InvalidData(format!("Invalid email: '{}'", email)));
        }

        let conn = self.conn()?;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::AlreadyExists(format!("Email already registered: {}", email)));
        }

        conn.execute("INSERT INTO users (email) VALUES (?)", params![email])?;
        let id = conn.last_insert_rowid();
        info!("Registered user {} ({})", id, email);
        Ok(id)
    }

    /// Look up an active user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, is_active, created_at FROM users WHERE email = ? AND is_active = 1",
                params![normalize_email(email)],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users, active or not
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, email, is_active, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Deactivate a user; their data stays but lookups no longer find them
    pub fn deactivate_user(&self, email: &str) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET is_active = 0 WHERE email = ?",
            params![normalize_email(email)],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", email)));
        }
        Ok(())
    }
}
