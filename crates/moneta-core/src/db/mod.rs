//! Ledger storage with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - User registration and lookup
//! - `rules` - Per-user learned rules
//! - `records` - Record CRUD, classification on insert, corrections, reports
//! - `recurring` - Recurring templates and monthly generation

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tempfile::TempDir;
use tracing::info;

use crate::error::Result;

mod records;
mod recurring;
mod rules;
mod users;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored "YYYY-MM-DD" date column
pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Ledger database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Backing directory of a throwaway database, removed with the last clone
    temp_dir: Option<Arc<TempDir>>,
}

impl Database {
    /// Open (or create) a ledger database and run migrations
    pub fn new(path: &str) -> Result<Self> {
        // Foreign keys are a per-connection setting
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            temp_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a file in a fresh temp directory rather than `:memory:` because
    /// every pooled connection to `:memory:` would see its own empty database.
    /// The directory, WAL and SHM files included, is deleted when the last
    /// clone of the handle is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("moneta_test_").tempdir()?;
        let path = dir.path().join("moneta.db");

        let mut db = Self::new(&path.to_string_lossy())?;
        db.temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Users
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Records (classified transactions)
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date DATE NOT NULL,                        -- YYYY-MM-DD
                description TEXT NOT NULL,
                amount REAL NOT NULL,                      -- + income, - expense
                category TEXT NOT NULL,
                confidence REAL NOT NULL CHECK (confidence >= 0 AND confidence <= 1),
                source TEXT NOT NULL DEFAULT 'manual',     -- manual, recurring, import
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_records_user_date ON records(user_id, date);

            -- Learned rules ("description contains" => category)
            CREATE TABLE IF NOT EXISTS user_rules (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                contains TEXT NOT NULL,                    -- normalized pattern
                category TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, contains)
            );

            -- Recurring templates
            CREATE TABLE IF NOT EXISTS recurring_rules (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                schedule TEXT NOT NULL DEFAULT 'monthly',  -- monthly (weekly, biweekly reserved)
                day_of_month INTEGER NOT NULL DEFAULT 1,
                active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_recurring_user ON recurring_rules(user_id);
            "#,
        )?;

        info!("Database migrations complete ({})", self.db_path);
        Ok(())
    }
}
