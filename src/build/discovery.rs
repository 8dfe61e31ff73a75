//! Source file discovery for the build system.
//!
//! Expands the precedence patterns and the catch-all pattern from the
//! configuration into one ordered manifest of code files, and the icon
//! patterns into a sorted manifest of resource files.

use crate::build::{BuildContext, OrderedManifest};
use crate::error::{Result, ShipError};
use glob::{glob_with, MatchOptions};
use std::path::{Path, PathBuf};

/// Glob options shared by every expansion.
///
/// Hidden files (such as the `.wrapper.js` template living next to the code)
/// only match when named literally.
fn match_options() -> MatchOptions {
    MatchOptions { case_sensitive: true, require_literal_separator: true, require_literal_leading_dot: true }
}

/// Discover files matching a glob pattern relative to `base_dir`.
///
/// Matches are returned sorted by path. A pattern matching nothing yields an
/// empty list.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = base_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let paths = glob_with(&pattern_str, match_options())
        .map_err(|e| ShipError::config(format!("invalid glob pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(pattern, error = %e, "unreadable path skipped during discovery");
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Resolve precedence patterns plus a catch-all into one ordered manifest.
///
/// Patterns are expanded in order. A file already placed by an earlier
/// pattern keeps that position and is skipped by every later pattern.
pub fn resolve_ordered(
    src_dir: &Path,
    precedence: &[String],
    catch_all: &str,
) -> Result<OrderedManifest> {
    ensure_source_dir(src_dir)?;

    let mut manifest = OrderedManifest::new();
    for pattern in precedence.iter().map(String::as_str).chain(std::iter::once(catch_all)) {
        let mut added = 0;
        for path in discover_files(src_dir, pattern)? {
            if manifest.push(path) {
                added += 1;
            }
        }
        tracing::debug!(pattern, added, "expanded source pattern");
    }

    Ok(manifest)
}

/// Resolve resource patterns into a lexicographically sorted manifest.
///
/// Sorting across patterns makes the embedding order independent of the
/// platform's directory enumeration order.
pub fn resolve_resources(src_dir: &Path, patterns: &[String]) -> Result<OrderedManifest> {
    ensure_source_dir(src_dir)?;

    let mut all = Vec::new();
    for pattern in patterns {
        all.extend(discover_files(src_dir, pattern)?);
    }
    all.sort();

    let mut manifest = OrderedManifest::new();
    for path in all {
        manifest.push(path);
    }
    Ok(manifest)
}

/// Code manifest for a build context.
pub fn discover_code(ctx: &BuildContext) -> Result<OrderedManifest> {
    let scripts = &ctx.config().scripts;
    resolve_ordered(&ctx.src_dir(), &scripts.precedence, &scripts.catch_all)
}

/// Resource manifest for a build context.
pub fn discover_resources(ctx: &BuildContext) -> Result<OrderedManifest> {
    resolve_resources(&ctx.src_dir(), &ctx.config().icons.sources)
}

/// Both manifests of a build, discovered before anything is read.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    /// Code files in concatenation order
    pub code: OrderedManifest,
    /// Icon resources, sorted by path
    pub resources: OrderedManifest,
}

impl SourceSet {
    /// Discover code and resources for a build context.
    pub fn discover(ctx: &BuildContext) -> Result<Self> {
        let code = discover_code(ctx)?;
        let resources = discover_resources(ctx)?;
        if code.is_empty() {
            tracing::warn!(src = %ctx.src_dir().display(), "no code files matched the script patterns");
        }
        Ok(Self { code, resources })
    }

    /// Every discovered path, code first.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        self.code.paths().iter().chain(self.resources.paths()).cloned().collect()
    }
}

fn ensure_source_dir(src_dir: &Path) -> Result<()> {
    if src_dir.is_dir() {
        Ok(())
    } else {
        Err(ShipError::config(format!("source directory not found: {}", src_dir.display())))
    }
}
