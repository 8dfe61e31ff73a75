//! Build context containing configuration and state for a build.

use crate::config::{ShipConfig, StylesConfig};
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// The context provides access to all information needed to execute a build,
/// including the configuration, project root, and output directories.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: ShipConfig,
    /// Project root directory (where ship.toml is located)
    project_root: PathBuf,
    /// Release tag overriding the recorded version in banners
    tag: Option<String>,
    /// Optional filter to build specific targets only
    target_filter: Option<Vec<String>>,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: ShipConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, tag: None, target_filter: None }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ShipConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the source directory (resolved to absolute path).
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Get the output directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Path of the persisted version record.
    pub fn version_file(&self) -> PathBuf {
        self.resolve_path(&self.config.project.version_file)
    }

    /// Path of the module wrapper template.
    pub fn wrapper_path(&self) -> PathBuf {
        self.src_dir().join(&self.config.scripts.wrapper)
    }

    /// Stylesheet settings for this build.
    ///
    /// An explicit `[styles]` section wins. Otherwise the conventional
    /// `scss/<name>.scss` entry is used if it exists under the source root.
    pub fn styles(&self) -> Option<StylesConfig> {
        if let Some(styles) = &self.config.styles {
            return Some(styles.clone());
        }
        let conventional = StylesConfig::conventional(&self.config.project.name);
        self.src_dir().join(&conventional.entry).is_file().then_some(conventional)
    }

    /// Release tag, if one was supplied.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set the release tag.
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Set target filter to build only specific targets.
    pub fn with_filter(mut self, targets: Vec<String>) -> Self {
        self.target_filter = Some(targets);
        self
    }

    /// Get the target filter.
    pub fn target_filter(&self) -> Option<&[String]> {
        self.target_filter.as_deref()
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::loader::resolve_path(&self.project_root, path)
    }
}
