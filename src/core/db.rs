//! SQLite plumbing for the experiment record table.

use crate::core::error::ConfmanError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const EXPERIMENT_DB_NAME: &str = "experiment_record.db";

pub const EXPERIMENT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS experiments (
    row_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    module     TEXT NOT NULL,
    experiment TEXT NOT NULL,
    version    REAL NOT NULL,
    file_name  TEXT NOT NULL,
    note       TEXT,
    saved_at   TEXT NOT NULL
);
";

pub fn experiment_db_path(project_root: &Path) -> PathBuf {
    project_root.join(EXPERIMENT_DB_NAME)
}

pub fn db_connect(db_path: &Path) -> Result<Connection, ConfmanError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(ConfmanError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(ConfmanError::RusqliteError)?;
    Ok(conn)
}

/// Open the per-project experiment database, creating the table on first use.
pub fn connect_experiments(project_root: &Path) -> Result<Connection, ConfmanError> {
    let conn = db_connect(&experiment_db_path(project_root))?;
    conn.execute_batch(EXPERIMENT_SCHEMA)
        .map_err(ConfmanError::RusqliteError)?;
    Ok(conn)
}
