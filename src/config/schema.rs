//! Configuration schema types for `ship.toml`
//!
//! Defines the structure and validation rules for a shipwright project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Artifact base name (e.g. "photo-sphere-viewer")
    pub name: String,
    /// Human-readable title used in the banner
    #[serde(default)]
    pub title: Option<String>,
    /// Fallback version when neither a tag nor a version record is available
    #[serde(default = "default_version")]
    pub version: String,
    /// Source root
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Distribution output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Persisted version metadata record
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,
}

impl ProjectConfig {
    /// Title for the banner, falling back to the artifact name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_out() -> PathBuf {
    PathBuf::from("dist")
}

fn default_version_file() -> PathBuf {
    PathBuf::from("package.json")
}

/// Script ordering and wrapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Patterns expanded first, in priority order
    #[serde(default = "default_precedence")]
    pub precedence: Vec<String>,
    /// Pattern collecting every remaining code file
    #[serde(default = "default_catch_all")]
    pub catch_all: String,
    /// Universal module template, relative to the source root
    #[serde(default = "default_wrapper")]
    pub wrapper: PathBuf,
    /// Substitution marker inside the template
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Separator placed between fragments
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            precedence: default_precedence(),
            catch_all: default_catch_all(),
            wrapper: default_wrapper(),
            marker: default_marker(),
            separator: default_separator(),
        }
    }
}

fn default_precedence() -> Vec<String> {
    vec![
        "js/PhotoSphereViewer.js".to_string(),
        "js/PhotoSphereViewer.*.js".to_string(),
        "js/components/PSVComponent.js".to_string(),
        "js/components/*.js".to_string(),
        "js/buttons/PSVNavBarButton.js".to_string(),
        "js/buttons/*.js".to_string(),
    ]
}

fn default_catch_all() -> String {
    "js/*.js".to_string()
}

fn default_wrapper() -> PathBuf {
    PathBuf::from("js/.wrapper.js")
}

fn default_marker() -> String {
    "@@js".to_string()
}

fn default_separator() -> String {
    "\n\n".to_string()
}

/// Inline icon embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconsConfig {
    /// Glob patterns for icon resources
    #[serde(default = "default_icon_sources")]
    pub sources: Vec<String>,
    /// Expression of the registry object the icons are assigned into
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self { sources: default_icon_sources(), namespace: default_namespace() }
    }
}

fn default_icon_sources() -> Vec<String> {
    vec!["icons/*.svg".to_string()]
}

fn default_namespace() -> String {
    "PhotoSphereViewer.ICONS".to_string()
}

/// Stylesheet build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesConfig {
    /// SCSS entry point, relative to the source root
    pub entry: PathBuf,
    /// Browser support matrix (browserslist queries)
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
}

impl StylesConfig {
    /// The stylesheet a project gets without a `[styles]` section:
    /// `scss/<name>.scss` under the source root, default browsers.
    pub fn conventional(project_name: &str) -> Self {
        Self {
            entry: PathBuf::from("scss").join(format!("{}.scss", project_name)),
            browsers: default_browsers(),
        }
    }
}

fn default_browsers() -> Vec<String> {
    vec!["last 2 versions".to_string(), "ie >= 11".to_string()]
}

/// License banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    /// Banner text; `{{name}}`, `{{version}}` and `{{year}}` are substituted
    #[serde(default = "default_banner")]
    pub template: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self { template: default_banner() }
    }
}

fn default_banner() -> String {
    [
        "/*!",
        " * {{name}} {{version}}",
        " * Copyright (c) 2014-2015 Jérémy Heleine",
        " * Copyright (c) 2015-{{year}} Damien \"Mistic\" Sorel",
        " * Licensed under MIT (https://opensource.org/licenses/MIT)",
        " */",
    ]
    .join("\n")
}

/// Release branches and messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Branch the release is made on
    #[serde(default = "default_target_branch")]
    pub target_branch: String,
    /// Branch merged into the target
    #[serde(default = "default_source_branch")]
    pub source_branch: String,
    /// Merge and tag message; `{tag}` is substituted
    #[serde(default = "default_release_message")]
    pub message: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            target_branch: default_target_branch(),
            source_branch: default_source_branch(),
            message: default_release_message(),
        }
    }
}

fn default_target_branch() -> String {
    "master".to_string()
}

fn default_source_branch() -> String {
    "dev".to_string()
}

fn default_release_message() -> String {
    "Release {tag}".to_string()
}

/// Documentation site output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocConfig {
    /// Doc site directory (cleaned by `ship doc`)
    #[serde(default = "default_doc_out")]
    pub out: PathBuf,
    /// Customization script copied into the doc site, relative to the project root
    #[serde(default = "default_doc_script")]
    pub script: PathBuf,
    /// Destination of the script inside the doc site
    #[serde(default = "default_doc_script_dest")]
    pub script_dest: PathBuf,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            out: default_doc_out(),
            script: default_doc_script(),
            script_dest: default_doc_script_dest(),
        }
    }
}

fn default_doc_out() -> PathBuf {
    PathBuf::from("doc")
}

fn default_doc_script() -> PathBuf {
    PathBuf::from("build/jsdoc.js")
}

fn default_doc_script_dest() -> PathBuf {
    PathBuf::from("js/custom.js")
}

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: true }
    }
}

/// Complete ship.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub icons: IconsConfig,
    /// Stylesheet build; when omitted, `scss/<name>.scss` is built if it exists
    #[serde(default)]
    pub styles: Option<StylesConfig>,
    #[serde(default)]
    pub banner: BannerConfig,
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub doc: DocConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "scripts.marker")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ship.toml: '{}' {}", self.field, self.message)
    }
}

impl ShipConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        if self.project.name.trim().is_empty() {
            push("project.name", "must be a non-empty string");
        }
        if self.project.name.contains(['/', '\\']) {
            push("project.name", "must not contain path separators");
        }

        if self.scripts.catch_all.trim().is_empty() {
            push("scripts.catch_all", "must be a glob pattern");
        }
        if self.scripts.marker.trim().is_empty() {
            push("scripts.marker", "must be a non-empty string");
        }
        if self.scripts.marker.contains('\n') {
            push("scripts.marker", "must fit on a single line");
        }

        if self.icons.namespace.trim().is_empty() {
            push("icons.namespace", "must be a non-empty expression");
        }

        if let Some(styles) = &self.styles {
            if styles.browsers.is_empty() {
                push("styles.browsers", "must contain at least one query");
            }
        }

        if self.release.target_branch == self.release.source_branch {
            push("release.source_branch", "must differ from release.target_branch");
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parse() {
        let toml = r#"
[project]
name = "viewer"
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.project.name, "viewer");
        assert_eq!(config.project.src, PathBuf::from("src"));
        assert_eq!(config.project.out, PathBuf::from("dist"));
        assert_eq!(config.scripts.marker, "@@js");
        assert_eq!(config.scripts.separator, "\n\n");
        assert_eq!(config.icons.namespace, "PhotoSphereViewer.ICONS");
        assert!(config.styles.is_none());
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[project]
name = "viewer"
title = "Viewer"
src = "lib"
out = "public"
version_file = "meta/package.json"

[scripts]
precedence = ["core.js", "parts/*.js"]
catch_all = "**/*.js"
wrapper = "wrap.tpl"
marker = "%%BODY%%"
separator = "\n;\n"

[icons]
sources = ["svg/*.svg"]
namespace = "Viewer.ICONS"

[styles]
entry = "scss/viewer.scss"
browsers = ["defaults"]

[banner]
template = "/* {{name}} */"

[release]
target_branch = "main"
source_branch = "next"
message = "v{tag}"

[doc]
out = "site"

[watch]
debounce_ms = 250
clear_screen = false
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.project.display_title(), "Viewer");
        assert_eq!(config.project.version_file, PathBuf::from("meta/package.json"));
        assert_eq!(config.scripts.precedence, vec!["core.js", "parts/*.js"]);
        assert_eq!(config.scripts.marker, "%%BODY%%");
        assert_eq!(config.scripts.separator, "\n;\n");
        assert_eq!(config.icons.sources, vec!["svg/*.svg"]);
        let styles = config.styles.as_ref().unwrap();
        assert_eq!(styles.entry, PathBuf::from("scss/viewer.scss"));
        assert_eq!(styles.browsers, vec!["defaults"]);
        assert_eq!(config.banner.template, "/* {{name}} */");
        assert_eq!(config.release.target_branch, "main");
        assert_eq!(config.release.message, "v{tag}");
        assert_eq!(config.doc.out, PathBuf::from("site"));
        assert_eq!(config.doc.script_dest, PathBuf::from("js/custom.js"));
        assert_eq!(config.watch.debounce_ms, 250);
        assert!(!config.watch.clear_screen);
    }

    #[test]
    fn test_styles_default_browsers() {
        let toml = r#"
[project]
name = "viewer"

[styles]
entry = "scss/viewer.scss"
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.styles.unwrap().browsers, vec!["last 2 versions", "ie >= 11"]);
    }

    #[test]
    fn test_conventional_styles_entry() {
        let styles = StylesConfig::conventional("photo-sphere-viewer");
        assert_eq!(styles.entry, PathBuf::from("scss/photo-sphere-viewer.scss"));
        assert_eq!(styles.browsers, default_browsers());
    }

    #[test]
    fn test_validation_empty_name() {
        let toml = r#"
[project]
name = ""
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "project.name"));
    }

    #[test]
    fn test_validation_multiline_marker() {
        let toml = r#"
[project]
name = "viewer"

[scripts]
marker = "a\nb"
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "scripts.marker"));
    }

    #[test]
    fn test_validation_same_branches() {
        let toml = r#"
[project]
name = "viewer"

[release]
target_branch = "main"
source_branch = "main"
"#;
        let config: ShipConfig = toml::from_str(toml).unwrap();
        assert!(!config.is_valid());
    }

    #[test]
    fn test_default_banner_placeholders() {
        let banner = BannerConfig::default();
        assert!(banner.template.starts_with("/*!"));
        assert!(banner.template.contains("{{version}}"));
        assert!(banner.template.contains("{{year}}"));
    }
}
