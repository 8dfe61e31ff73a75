//! Named build outputs held in memory until the whole set is ready.

use crate::error::{Result, ShipError};
use std::fs;
use std::path::{Path, PathBuf};

/// What an artifact contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Script,
    Stylesheet,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Script => write!(f, "script"),
            ContentType::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// A finished, banner-stamped output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
    pub content_type: ContentType,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>, content_type: ContentType) -> Self {
        Self { file_name: file_name.into(), content: content.into(), content_type }
    }

    /// Write the artifact into `out_dir`, returning the written path.
    pub fn write_to(&self, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(&self.file_name);
        fs::write(&path, &self.content).map_err(|e| ShipError::io(&path, e))?;
        tracing::info!(path = %path.display(), bytes = self.content.len(), "wrote artifact");
        Ok(path)
    }
}

/// Write every artifact, creating the output directory first.
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| ShipError::io(out_dir, e))?;
    artifacts.iter().map(|a| a.write_to(out_dir)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_artifacts_creates_out_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist/nested");
        let artifacts = vec![
            Artifact::new("a.js", "var a;", ContentType::Script),
            Artifact::new("a.css", ".a{}", ContentType::Stylesheet),
        ];

        let written = write_artifacts(&out, &artifacts).unwrap();

        assert_eq!(written, vec![out.join("a.js"), out.join("a.css")]);
        assert_eq!(fs::read_to_string(out.join("a.css")).unwrap(), ".a{}");
    }

    #[test]
    fn test_write_into_file_path_fails_with_io() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("dist");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_artifacts(&blocker, &[Artifact::new("a.js", "", ContentType::Script)])
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
