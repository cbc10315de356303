//! confman: versioned YAML configuration management on plain disk
//!
//! **confman organizes configuration documents as individually named files
//! and keeps the bookkeeping honest.**
//!
//! A project is a directory tree: one subdirectory per *module*, each holding
//! YAML documents named `(module)_(experiment)_v(version).yaml`. On top of
//! the tree sit two logs: an experiment record table appended manually when
//! a configuration is worth remembering, and a most-recent-first history of
//! every document access.
//!
//! # Core Principles
//!
//! - **Local-first**: all state is plain files under one project directory
//! - **Write-through**: logs are persisted on every mutation and reloaded on
//!   every read, so nothing is lost between process runs
//! - **One name, one key**: the filename codec is bijective and is the only
//!   place the naming convention is interpreted
//!
//! # Example
//!
//! ```no_run
//! use confman::core::name::Version;
//! use confman::core::store::ConfigManager;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), confman::core::error::ConfmanError> {
//! let mgr = ConfigManager::new("riiid", Path::new("/tmp/projects"))?;
//! mgr.create_module("data")?;
//! mgr.create("data", Some("train"), Version::new(1.0)?, None)?;
//! let record = mgr.save_experiment("data", Version::new(1.0)?, Some("train"), Some("baseline"))?;
//! let doc = mgr.load_experiment(record.row_id)?;
//! # let _ = doc;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
