use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfmanError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Malformed configuration name: {0}")]
    MalformedName(String),
    #[error("No experiment record with row id {0}")]
    RowNotFound(i64),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
