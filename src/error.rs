//! Error taxonomy shared by the build pipeline and the release machine.
//!
//! Every failure the tool can report falls into one of four kinds. The kind
//! decides the process exit status, so callers (CI scripts, release
//! operators) can tell which stage failed without parsing messages.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline stage that rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Script minification
    Minify,
    /// SCSS compilation
    StyleCompile,
    /// Vendor prefixing
    Prefix,
    /// Stylesheet minification
    StyleMinify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Minify => write!(f, "minify"),
            Stage::StyleCompile => write!(f, "stylesheet compile"),
            Stage::Prefix => write!(f, "vendor prefix"),
            Stage::StyleMinify => write!(f, "stylesheet minify"),
        }
    }
}

/// Coarse classification of a [`ShipError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transform,
    Repository,
    Io,
}

impl ErrorKind {
    /// Process exit status reported for this kind of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Io => 1,
            ErrorKind::Configuration => 2,
            ErrorKind::Transform => 3,
            ErrorKind::Repository => 4,
        }
    }
}

/// Errors produced while building or releasing.
#[derive(Debug, Error)]
pub enum ShipError {
    /// Malformed or missing required input
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A transform stage rejected its input
    #[error("{stage} failed: {message}")]
    Transform { stage: Stage, message: String },

    /// A release transition could not complete
    #[error("repository error during {step}: {message}")]
    Repository { step: String, message: String },

    /// File system failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShipError {
    pub fn config(message: impl Into<String>) -> Self {
        ShipError::Configuration(message.into())
    }

    pub fn transform(stage: Stage, message: impl Into<String>) -> Self {
        ShipError::Transform { stage, message: message.into() }
    }

    pub fn repository(step: impl Into<String>, message: impl Into<String>) -> Self {
        ShipError::Repository { step: step.into(), message: message.into() }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ShipError::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ShipError::Configuration(_) => ErrorKind::Configuration,
            ShipError::Transform { .. } => ErrorKind::Transform,
            ShipError::Repository { .. } => ErrorKind::Repository,
            ShipError::Io { .. } => ErrorKind::Io,
        }
    }
}

impl From<crate::config::ConfigError> for ShipError {
    fn from(e: crate::config::ConfigError) -> Self {
        ShipError::Configuration(e.to_string())
    }
}

pub type Result<T, E = ShipError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_kinds() {
        let codes = [
            ShipError::config("x").kind().exit_code(),
            ShipError::transform(Stage::Minify, "x").kind().exit_code(),
            ShipError::repository("merge", "x").kind().exit_code(),
            ShipError::io("a", std::io::Error::other("x")).kind().exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_transform_message_names_stage() {
        let err = ShipError::transform(Stage::Prefix, "bad selector");
        assert_eq!(err.to_string(), "vendor prefix failed: bad selector");
    }
}
