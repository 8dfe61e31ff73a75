//! The persisted version record (a `package.json`-style JSON document).
//!
//! Reads and rewrites keep every other field and the field order intact;
//! the file is written back as two-space pretty JSON with one trailing
//! newline.

use crate::error::{Result, ShipError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Version record loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRecord {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl VersionRecord {
    /// Load a record. A missing or malformed file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShipError::config(format!("version record not found: {}", path.display()))
            } else {
                ShipError::io(path, e)
            }
        })?;
        Self::parse(path, &text)
    }

    /// Parse record text; `path` is kept for saving and messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            ShipError::config(format!("invalid version record {}: {}", path.display(), e))
        })?;

        match value {
            Value::Object(fields) => Ok(Self { path: path.to_path_buf(), fields }),
            _ => Err(ShipError::config(format!(
                "version record {} is not a JSON object",
                path.display()
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `version` field, if present and a string.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Replace the `version` field, keeping its position.
    ///
    /// A record without one gets the field appended.
    pub fn set_version(&mut self, version: &str) {
        self.fields.insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Serialized form written back to disk.
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.fields)
            .map_err(|e| ShipError::config(format!("cannot serialize version record: {}", e)))?;
        text.push('\n');
        Ok(text)
    }

    pub fn save(&self) -> Result<()> {
        let text = self.to_json()?;
        fs::write(&self.path, text).map_err(|e| ShipError::io(&self.path, e))
    }
}

/// Rewrite the record's version to `tag`. Returns the previous version.
pub fn bump_version(path: &Path, tag: &str) -> Result<Option<String>> {
    let mut record = VersionRecord::load(path)?;
    let previous = record.version().map(str::to_string);
    record.set_version(tag);
    record.save()?;
    tracing::info!(
        path = %path.display(),
        from = previous.as_deref().unwrap_or("<none>"),
        to = tag,
        "version record updated"
    );
    Ok(previous)
}
