//! Reading, writing, and seeding of YAML configuration documents.
//!
//! A document is an ordered key-value mapping with arbitrarily nested
//! values; no schema is enforced. Callers treat it as opaque data they
//! read and write by key.

use crate::core::error::ConfmanError;
use crate::core::name::Version;
use crate::core::time;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// The parsed contents of one configuration file.
pub type Document = Mapping;

/// Keys seeded into every new document and never overwritten by `merge`.
pub const RESERVED_KEYS: &[&str] = &["VERSION", "CREATED_AT"];

pub fn read_document(path: &Path) -> Result<Document, ConfmanError> {
    let raw = fs::read_to_string(path)?;
    let doc: Document = serde_yaml::from_str(&raw)?;
    Ok(doc)
}

pub fn write_document(path: &Path, doc: &Document) -> Result<(), ConfmanError> {
    let raw = serde_yaml::to_string(doc)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Template for a freshly created document: its version and creation time.
pub fn seed_document(version: Version) -> Document {
    let mut doc = Mapping::new();
    doc.insert(
        Value::String("VERSION".to_string()),
        Value::Number(serde_yaml::Number::from(version.value())),
    );
    doc.insert(
        Value::String("CREATED_AT".to_string()),
        Value::String(time::now_epoch_z()),
    );
    doc
}

/// Overlay `updates` onto `base`, skipping the reserved bookkeeping keys.
/// Existing keys not named in `updates` survive.
pub fn merge_into(base: &mut Document, updates: &Document) {
    for (k, v) in updates {
        if let Value::String(name) = k {
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
        }
        base.insert(k.clone(), v.clone());
    }
}
