//! The configuration store: one manager per `(project_name, project_path)`.
//!
//! All state lives under `{project_path}/{project_name}/`: one subdirectory
//! per module holding the YAML documents, a SQLite experiment record table,
//! and the YAML usage history. Every operation resolves a filename through
//! the codec in [`crate::core::name`], touches exactly one file or table row,
//! and on success appends one history entry.

use crate::core::db;
use crate::core::document::{self, Document};
use crate::core::error::ConfmanError;
use crate::core::experiment::{self, ExperimentRecord};
use crate::core::history::{self, HistoryEntry};
use crate::core::name::{self, ConfigKey, Version};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Manager for one project's configuration tree.
///
/// Holds no document state in memory; the logs are reloaded from disk on
/// every read and written through on every mutation, so two managers built
/// over the same path in sequence (or across process restarts) agree.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    project_name: String,
    project_root: PathBuf,
}

impl ConfigManager {
    /// Bind a manager to `project_name` under the existing directory
    /// `project_path`. Creates `{project_path}/{project_name}/` and the
    /// experiment table on first use.
    pub fn new(project_name: &str, project_path: &Path) -> Result<Self, ConfmanError> {
        name::validate_component("project name", project_name)?;
        if !project_path.is_dir() {
            return Err(ConfmanError::NotFound(format!(
                "project path '{}' is not an existing directory",
                project_path.display()
            )));
        }
        let project_root = project_path.join(project_name);
        fs::create_dir_all(&project_root)?;
        db::connect_experiments(&project_root)?;
        Ok(ConfigManager {
            project_name: project_name.to_string(),
            project_root,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// `{project_path}/{project_name}/`
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Build the key for `(module, experiment, version)`. An omitted
    /// experiment resolves to the project name.
    pub fn resolve_key(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
    ) -> Result<ConfigKey, ConfmanError> {
        ConfigKey::new(module, experiment.unwrap_or(&self.project_name), version)
    }

    fn module_path(&self, module: &str) -> PathBuf {
        self.project_root.join(module)
    }

    fn document_path(&self, key: &ConfigKey) -> Result<(PathBuf, String), ConfmanError> {
        let file_name = key.file_name()?;
        Ok((self.module_path(&key.module).join(&file_name), file_name))
    }

    // ----- modules -----

    /// Existing module directories, sorted.
    pub fn modules(&self) -> Result<Vec<String>, ConfmanError> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.project_root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                out.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Idempotent: an already existing module directory is not an error.
    pub fn create_module(&self, module: &str) -> Result<(), ConfmanError> {
        name::validate_component("module", module)?;
        if module.contains('_') {
            return Err(ConfmanError::MalformedName(format!(
                "module '{}' must not contain the '_' separator",
                module
            )));
        }
        fs::create_dir_all(self.module_path(module))?;
        Ok(())
    }

    /// Removes the module directory and every document in it, then purges
    /// experiment records referencing the module. Destructive; any
    /// confirmation belongs to the caller.
    pub fn delete_module(&self, module: &str) -> Result<(), ConfmanError> {
        let path = self.module_path(module);
        if !path.is_dir() {
            return Err(ConfmanError::NotFound(format!(
                "no module '{}' to delete",
                module
            )));
        }
        fs::remove_dir_all(&path)?;
        let conn = db::connect_experiments(&self.project_root)?;
        experiment::purge_by_module(&conn, module)?;
        Ok(())
    }

    // ----- documents, keyed -----

    /// Create a new document. The module directory is created if missing;
    /// an existing document is an error. The document is seeded with
    /// `VERSION` and `CREATED_AT`, then `initial` is overlaid.
    pub fn create(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
        initial: Option<&Document>,
    ) -> Result<(), ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        self.create_key(&key, initial)
    }

    /// Replace the stored document wholesale. Not a merge: keys absent from
    /// `doc` do not survive.
    pub fn update(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
        doc: &Document,
    ) -> Result<(), ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        self.update_key(&key, doc)
    }

    /// Overlay `updates` onto the stored document, keeping keys it does not
    /// name and never touching the reserved bookkeeping keys.
    pub fn merge(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
        updates: &Document,
    ) -> Result<(), ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        self.merge_key(&key, updates)
    }

    pub fn get(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
    ) -> Result<Document, ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        self.get_key(&key)
    }

    /// Delete the document and purge experiment records referencing it.
    pub fn delete(
        &self,
        module: &str,
        experiment: Option<&str>,
        version: Version,
    ) -> Result<(), ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        self.delete_key(&key)
    }

    // ----- documents, by literal filename -----
    //
    // The name must decode so history keys stay well-formed; after that the
    // call is identical to the keyed form.

    pub fn create_named(
        &self,
        file_name: &str,
        initial: Option<&Document>,
    ) -> Result<(), ConfmanError> {
        let key = name::decode(file_name)?;
        self.create_key(&key, initial)
    }

    pub fn update_named(&self, file_name: &str, doc: &Document) -> Result<(), ConfmanError> {
        let key = name::decode(file_name)?;
        self.update_key(&key, doc)
    }

    pub fn merge_named(&self, file_name: &str, updates: &Document) -> Result<(), ConfmanError> {
        let key = name::decode(file_name)?;
        self.merge_key(&key, updates)
    }

    pub fn get_named(&self, file_name: &str) -> Result<Document, ConfmanError> {
        let key = name::decode(file_name)?;
        self.get_key(&key)
    }

    pub fn delete_named(&self, file_name: &str) -> Result<(), ConfmanError> {
        let key = name::decode(file_name)?;
        self.delete_key(&key)
    }

    // ----- listings -----

    /// Sorted filenames under one module, recomputed on every call.
    pub fn show(&self, module: &str) -> Result<Vec<String>, ConfmanError> {
        let path = self.module_path(module);
        if !path.is_dir() {
            return Err(ConfmanError::NotFound(format!("no module '{}'", module)));
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                out.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Filenames of every module, keyed by module name.
    pub fn show_all(&self) -> Result<BTreeMap<String, Vec<String>>, ConfmanError> {
        let mut all = BTreeMap::new();
        for module in self.modules()? {
            let files = self.show(&module)?;
            all.insert(module, files);
        }
        Ok(all)
    }

    /// Total number of documents across all modules.
    pub fn doc_count(&self) -> Result<usize, ConfmanError> {
        Ok(self.show_all()?.values().map(Vec::len).sum())
    }

    // ----- experiment log -----

    /// Record the referenced document in the experiment table. The document
    /// must exist; the new record carries the next never-reused row id.
    pub fn save_experiment(
        &self,
        module: &str,
        version: Version,
        experiment: Option<&str>,
        note: Option<&str>,
    ) -> Result<ExperimentRecord, ConfmanError> {
        let key = self.resolve_key(module, experiment, version)?;
        let (path, file_name) = self.document_path(&key)?;
        if !path.is_file() {
            return Err(ConfmanError::NotFound(format!(
                "no document '{}' to save as an experiment",
                file_name
            )));
        }
        let conn = db::connect_experiments(&self.project_root)?;
        experiment::insert_record(&conn, &key, &file_name, note)
    }

    /// Live records in ascending row id order.
    pub fn show_experiment(&self) -> Result<Vec<ExperimentRecord>, ConfmanError> {
        let conn = db::connect_experiments(&self.project_root)?;
        experiment::list_records(&conn)
    }

    /// Fetch the document referenced by record `row_id`. Reads through
    /// [`ConfigManager::get`], so the access lands in history. The log
    /// itself is not mutated.
    pub fn load_experiment(&self, row_id: i64) -> Result<Document, ConfmanError> {
        let conn = db::connect_experiments(&self.project_root)?;
        let record = experiment::get_record(&conn, row_id)?
            .ok_or(ConfmanError::RowNotFound(row_id))?;
        self.get(&record.module, Some(&record.experiment), record.version)
    }

    /// Remove record `row_id` only. The referenced document is untouched.
    pub fn delete_experiment(&self, row_id: i64) -> Result<(), ConfmanError> {
        let conn = db::connect_experiments(&self.project_root)?;
        experiment::delete_record(&conn, row_id)
    }

    // ----- history -----

    /// Past accesses for this project, newest first.
    pub fn show_history(&self) -> Result<Vec<HistoryEntry>, ConfmanError> {
        history::show(&self.project_root, &self.project_name)
    }

    // ----- internals -----

    fn create_key(&self, key: &ConfigKey, initial: Option<&Document>) -> Result<(), ConfmanError> {
        let (path, file_name) = self.document_path(key)?;
        fs::create_dir_all(self.module_path(&key.module))?;
        if path.is_file() {
            return Err(ConfmanError::AlreadyExists(format!(
                "document '{}' already exists",
                file_name
            )));
        }
        let mut doc = document::seed_document(key.version);
        if let Some(initial) = initial {
            document::merge_into(&mut doc, initial);
        }
        document::write_document(&path, &doc)?;
        history::record_access(&self.project_root, &self.project_name, key, &file_name)
    }

    fn update_key(&self, key: &ConfigKey, doc: &Document) -> Result<(), ConfmanError> {
        let (path, file_name) = self.document_path(key)?;
        if !path.is_file() {
            return Err(ConfmanError::NotFound(format!(
                "no document '{}' to update",
                file_name
            )));
        }
        document::write_document(&path, doc)?;
        history::record_access(&self.project_root, &self.project_name, key, &file_name)
    }

    fn merge_key(&self, key: &ConfigKey, updates: &Document) -> Result<(), ConfmanError> {
        let (path, file_name) = self.document_path(key)?;
        if !path.is_file() {
            return Err(ConfmanError::NotFound(format!(
                "no document '{}' to merge into",
                file_name
            )));
        }
        let mut doc = document::read_document(&path)?;
        document::merge_into(&mut doc, updates);
        document::write_document(&path, &doc)?;
        history::record_access(&self.project_root, &self.project_name, key, &file_name)
    }

    fn get_key(&self, key: &ConfigKey) -> Result<Document, ConfmanError> {
        let (path, file_name) = self.document_path(key)?;
        if !path.is_file() {
            return Err(ConfmanError::NotFound(format!(
                "no document '{}' to get",
                file_name
            )));
        }
        let doc = document::read_document(&path)?;
        history::record_access(&self.project_root, &self.project_name, key, &file_name)?;
        Ok(doc)
    }

    fn delete_key(&self, key: &ConfigKey) -> Result<(), ConfmanError> {
        let (path, file_name) = self.document_path(key)?;
        if !path.is_file() {
            return Err(ConfmanError::NotFound(format!(
                "no document '{}' to delete",
                file_name
            )));
        }
        let conn = db::connect_experiments(&self.project_root)?;
        experiment::purge_by_file(&conn, &file_name)?;
        fs::remove_file(&path)?;
        history::record_access(&self.project_root, &self.project_name, key, &file_name)
    }
}
