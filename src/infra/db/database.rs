//! SQLite database setup and connection management for the versioning engine
//! Handles database initialization, schema creation, and connection management.

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::repository::DbConn;

const SCHEMA_VERSION: i32 = 1;

/// Database wrapper that manages the SQLite connection.
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Create an in-memory database. Default for dashboard sessions and
    /// tests; history lives as long as the engine instance.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Create or open a durable database at a specific path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Shared handle to the underlying connection.
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    /// Initialize database schema.
    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let existing_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if existing_version < SCHEMA_VERSION {
            Self::create_schema(&conn)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        // One append-only log of commits across all document paths. `seq` is
        // the global append order; `id` is the externally visible commit id.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS commits (
                seq          INTEGER PRIMARY KEY AUTOINCREMENT,
                id           TEXT NOT NULL UNIQUE,
                path         TEXT NOT NULL,
                author       TEXT NOT NULL,
                message      TEXT NOT NULL,
                added        INTEGER NOT NULL,
                removed      INTEGER NOT NULL,
                modified     INTEGER NOT NULL,
                content      TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_commits_path ON commits(path, seq);
            "#,
        )?;
        Ok(())
    }
}
