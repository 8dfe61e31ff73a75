//! Source units and the ordered manifest they are read from.

use crate::error::{Result, ShipError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// What a source file contributes to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Script code, concatenated verbatim
    Code,
    /// Non-code payload (inline vector icons) turned into code by the embedder
    Resource,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Code => write!(f, "code"),
            SourceKind::Resource => write!(f, "resource"),
        }
    }
}

/// A source file read into memory. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: PathBuf,
    content: String,
    kind: SourceKind,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, kind: SourceKind) -> Self {
        Self { path: path.into(), content: content.into(), kind }
    }

    /// Read a unit from disk.
    pub fn read(path: &Path, kind: SourceKind) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ShipError::io(path, e))?;
        Ok(Self::new(path, content, kind))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Base file name including extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Ordered, duplicate-free sequence of source paths.
///
/// Insertion order is load-bearing: later code may reference symbols defined
/// earlier, so nothing downstream reorders entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedManifest {
    entries: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl OrderedManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path unless it is already present.
    ///
    /// Returns `true` if the path was added.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.entries.push(path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read every entry as a unit of the given kind, preserving order.
    pub fn read_units(&self, kind: SourceKind) -> Result<Vec<SourceUnit>> {
        self.entries.iter().map(|p| SourceUnit::read(p, kind)).collect()
    }
}

impl<'a> IntoIterator for &'a OrderedManifest {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
