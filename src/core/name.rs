//! Filename codec for configuration documents.
//!
//! Every document on disk is named `(module)_(experiment)_v(version).(ext)`,
//! e.g. `data_riiid_v1.0.yaml`. This module owns both directions of that
//! convention and is the only place the naming scheme is interpreted.

use crate::core::error::ConfmanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File extensions the codec recognizes. The first entry is the default
/// used when a caller does not name one explicitly.
pub const EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Default extension for newly created documents.
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Decimal version identifier for a configuration document.
///
/// Rendered with at least one fractional digit (`1` becomes `1.0`) so the
/// `_v` marker in a filename is always followed by an unambiguous decimal,
/// and parses back to the same numeric value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(f64);

impl Version {
    /// Build a version from a raw number. Rejects NaN, infinities, and
    /// negative values, none of which survive a filename round trip.
    pub fn new(value: f64) -> Result<Self, ConfmanError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfmanError::ValidationError(format!(
                "version must be a finite non-negative decimal, got {}",
                value
            )));
        }
        Ok(Version(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Version {
    type Err = ConfmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.parse().map_err(|_| {
            ConfmanError::MalformedName(format!("version should be a decimal, got '{}'", s))
        })?;
        Version::new(value)
            .map_err(|_| ConfmanError::MalformedName(format!("invalid version '{}'", s)))
    }
}

/// The (module, experiment, version) triple identifying one document.
///
/// `module` maps to a subdirectory and must not contain the `_` field
/// separator; `experiment` may contain `_` (the codec splits the stem on
/// the first separator, so everything after it up to the `_v` marker
/// belongs to the experiment name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKey {
    pub module: String,
    pub experiment: String,
    pub version: Version,
}

impl ConfigKey {
    pub fn new(module: &str, experiment: &str, version: Version) -> Result<Self, ConfmanError> {
        let key = ConfigKey {
            module: module.to_string(),
            experiment: experiment.to_string(),
            version,
        };
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), ConfmanError> {
        validate_component("module", &self.module)?;
        if self.module.contains('_') {
            return Err(ConfmanError::MalformedName(format!(
                "module '{}' must not contain the '_' separator",
                self.module
            )));
        }
        validate_component("experiment", &self.experiment)?;
        Ok(())
    }

    /// Render this key as a filename with the default `.yaml` extension.
    pub fn file_name(&self) -> Result<String, ConfmanError> {
        encode(self, DEFAULT_EXTENSION)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_v{}", self.module, self.experiment, self.version)
    }
}

pub(crate) fn validate_component(field: &str, value: &str) -> Result<(), ConfmanError> {
    if value.is_empty() {
        return Err(ConfmanError::MalformedName(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.contains('/') || value.contains('\\') || value.contains('.') {
        return Err(ConfmanError::MalformedName(format!(
            "{} '{}' must not contain path separators or '.'",
            field, value
        )));
    }
    Ok(())
}

/// Encode a key as `"{module}_{experiment}_v{version}.{extension}"`.
pub fn encode(key: &ConfigKey, extension: &str) -> Result<String, ConfmanError> {
    key.validate()?;
    if !EXTENSIONS.contains(&extension) {
        return Err(ConfmanError::MalformedName(format!(
            "extension should be one of {:?}, got '{}'",
            EXTENSIONS, extension
        )));
    }
    Ok(format!("{}.{}", key, extension))
}

/// Decode a filename back into a [`ConfigKey`].
///
/// Splits on the last `_v` before the extension, then on the first `_` of
/// what remains. Fails with [`ConfmanError::MalformedName`] when the name
/// lacks a recognized extension, lacks the `_v` marker, carries a
/// non-numeric version, or has an empty module or experiment part.
pub fn decode(file_name: &str) -> Result<ConfigKey, ConfmanError> {
    let (stem, extension) = file_name.rsplit_once('.').ok_or_else(|| {
        ConfmanError::MalformedName(format!("'{}' has no extension", file_name))
    })?;
    if !EXTENSIONS.contains(&extension) {
        return Err(ConfmanError::MalformedName(format!(
            "'{}' should end in one of {:?}",
            file_name, EXTENSIONS
        )));
    }

    let marker = stem.rfind("_v").ok_or_else(|| {
        ConfmanError::MalformedName(format!(
            "'{}' should match (module)_(experiment)_v(version).(ext)",
            file_name
        ))
    })?;
    let version: Version = stem[marker + 2..].parse()?;

    let (module, experiment) = stem[..marker].split_once('_').ok_or_else(|| {
        ConfmanError::MalformedName(format!(
            "'{}' should have both a module and an experiment part",
            file_name
        ))
    })?;
    if module.is_empty() || experiment.is_empty() {
        return Err(ConfmanError::MalformedName(format!(
            "'{}' has an empty module or experiment part",
            file_name
        )));
    }

    ConfigKey::new(module, experiment, version)
}
