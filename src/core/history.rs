//! Recently-used-document history.
//!
//! Every successful document operation appends one entry, newest first, to
//! the project's list inside `history.yaml`. The file is keyed by project
//! name so several projects can share a path without mixing lists. The file
//! is reloaded before every read and rewritten after every append, so the
//! in-memory view never outlives the process.

use crate::core::error::ConfmanError;
use crate::core::name::{ConfigKey, Version};
use crate::core::time;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILE_NAME: &str = "history.yaml";

/// Entries kept per project; the oldest are evicted past this point.
pub const HISTORY_LIMIT: usize = 100;

/// A past access to one document, newest first in [`show`] output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub module: String,
    pub experiment: String,
    pub version: Version,
    pub file_name: String,
    pub accessed_at: String,
}

type HistoryFile = BTreeMap<String, Vec<HistoryEntry>>;

pub fn history_path(project_root: &Path) -> PathBuf {
    project_root.join(HISTORY_FILE_NAME)
}

fn load(path: &Path) -> Result<HistoryFile, ConfmanError> {
    if !path.is_file() {
        return Ok(HistoryFile::new());
    }
    let raw = fs::read_to_string(path)?;
    let file: HistoryFile = serde_yaml::from_str(&raw)?;
    Ok(file)
}

fn store(path: &Path, file: &HistoryFile) -> Result<(), ConfmanError> {
    let raw = serde_yaml::to_string(file)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Append one access for `key`, write-through. Called only after the
/// underlying document operation succeeded.
pub fn record_access(
    project_root: &Path,
    project_name: &str,
    key: &ConfigKey,
    file_name: &str,
) -> Result<(), ConfmanError> {
    let path = history_path(project_root);
    let mut file = load(&path)?;
    let entries = file.entry(project_name.to_string()).or_default();
    entries.insert(
        0,
        HistoryEntry {
            module: key.module.clone(),
            experiment: key.experiment.clone(),
            version: key.version,
            file_name: file_name.to_string(),
            accessed_at: time::now_epoch_z(),
        },
    );
    entries.truncate(HISTORY_LIMIT);
    store(&path, &file)
}

/// Entries for `project_name` only, newest first.
pub fn show(project_root: &Path, project_name: &str) -> Result<Vec<HistoryEntry>, ConfmanError> {
    let file = load(&history_path(project_root))?;
    Ok(file.get(project_name).cloned().unwrap_or_default())
}
