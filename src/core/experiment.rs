//! Experiment record table.
//!
//! Records are appended manually by `save`, never auto-created, and are
//! addressed by a stable `row_id` assigned at insertion and never reused
//! (SQLite AUTOINCREMENT). Deleting a record removes that row only; the ids
//! of every other row are untouched, so a caller holding an id from an earlier
//! listing can still use it safely after unrelated deletes.

use crate::core::error::ConfmanError;
use crate::core::name::{ConfigKey, Version};
use crate::core::time;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// One entry in the experiment log referencing a [`ConfigKey`] plus a note
/// and the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub row_id: i64,
    pub module: String,
    pub experiment: String,
    pub version: Version,
    pub file_name: String,
    pub note: Option<String>,
    pub saved_at: String,
}

const SELECT_COLUMNS: &str = "row_id,module,experiment,version,file_name,note,saved_at";

pub fn insert_record(
    conn: &Connection,
    key: &ConfigKey,
    file_name: &str,
    note: Option<&str>,
) -> Result<ExperimentRecord, ConfmanError> {
    let saved_at = time::now_epoch_z();
    conn.execute(
        "INSERT INTO experiments(module, experiment, version, file_name, note, saved_at)
         VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            key.module,
            key.experiment,
            key.version.value(),
            file_name,
            note,
            saved_at
        ],
    )?;
    Ok(ExperimentRecord {
        row_id: conn.last_insert_rowid(),
        module: key.module.clone(),
        experiment: key.experiment.clone(),
        version: key.version,
        file_name: file_name.to_string(),
        note: note.map(str::to_string),
        saved_at,
    })
}

/// Live rows in ascending `row_id` order.
pub fn list_records(conn: &Connection) -> Result<Vec<ExperimentRecord>, ConfmanError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM experiments ORDER BY row_id ASC",
        SELECT_COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(record_from_row(row)?);
    }
    Ok(out)
}

pub fn get_record(conn: &Connection, row_id: i64) -> Result<Option<ExperimentRecord>, ConfmanError> {
    let mut stmt = stmt_for(conn, "row_id = ?1")?;
    let mut rows = stmt.query(rusqlite::params![row_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(record_from_row(row)?)),
        None => Ok(None),
    }
}

pub fn delete_record(conn: &Connection, row_id: i64) -> Result<(), ConfmanError> {
    let affected = conn.execute(
        "DELETE FROM experiments WHERE row_id = ?1",
        rusqlite::params![row_id],
    )?;
    if affected == 0 {
        return Err(ConfmanError::RowNotFound(row_id));
    }
    Ok(())
}

/// Drop every record referencing a deleted document. Returns rows removed.
pub fn purge_by_file(conn: &Connection, file_name: &str) -> Result<usize, ConfmanError> {
    let affected = conn.execute(
        "DELETE FROM experiments WHERE file_name = ?1",
        rusqlite::params![file_name],
    )?;
    Ok(affected)
}

/// Drop every record under a deleted module. Returns rows removed.
pub fn purge_by_module(conn: &Connection, module: &str) -> Result<usize, ConfmanError> {
    let affected = conn.execute(
        "DELETE FROM experiments WHERE module = ?1",
        rusqlite::params![module],
    )?;
    Ok(affected)
}

fn stmt_for<'c>(
    conn: &'c Connection,
    predicate: &str,
) -> Result<rusqlite::Statement<'c>, ConfmanError> {
    Ok(conn.prepare(&format!(
        "SELECT {} FROM experiments WHERE {}",
        SELECT_COLUMNS, predicate
    ))?)
}

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<ExperimentRecord, ConfmanError> {
    Ok(ExperimentRecord {
        row_id: row.get(0)?,
        module: row.get(1)?,
        experiment: row.get(2)?,
        version: Version::new(row.get(3)?)?,
        file_name: row.get(4)?,
        note: row.get(5)?,
        saved_at: row.get(6)?,
    })
}
