//! Build system integration tests
//!
//! End-to-end runs of the pipeline over a temporary project tree: source
//! ordering, icon embedding, wrapping, finishing and the all-or-nothing
//! output write.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use shipwright::build::{
    assemble_module, BuildContext, BuildPipeline, ModuleWrapper, SourceSet, TargetKind,
};
use shipwright::config::{default_config, load_config, StylesConfig};
use shipwright::error::ErrorKind;

// ============================================================================
// Test Utilities
// ============================================================================

/// Create a test file with content.
fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// The two-file project: `A.js`, `B.js`, one icon, a minimal wrapper.
fn create_test_project() -> (TempDir, BuildContext) {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    create_test_file(root, "src/js/.wrapper.js", "HEAD\n@@js\nTAIL");
    create_test_file(root, "src/js/A.js", "var A=1;");
    create_test_file(root, "src/js/B.js", "var B=2;");
    create_test_file(root, "src/icons/icon.svg", "<svg>\n<path/>\n</svg>");
    create_test_file(root, "package.json", "{\"name\":\"viewer\",\"version\":\"3.9.0\"}");

    let mut config = default_config();
    config.project.name = "viewer".to_string();
    config.scripts.precedence = vec!["js/A.js".to_string(), "js/B.js".to_string()];

    let ctx = BuildContext::new(config, root.to_path_buf());
    (temp, ctx)
}

const EXPECTED_BODY: &str =
    "var A=1;\n\nvar B=2;\n\nPhotoSphereViewer.ICONS['icon.svg'] = '<svg><path/></svg>';";

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_assembled_body_and_wrapping() {
    let (_temp, ctx) = create_test_project();
    let sources = SourceSet::discover(&ctx).unwrap();
    let module = assemble_module(&ctx, &sources).unwrap();

    assert_eq!(module.body, EXPECTED_BODY);
    assert_eq!(module.wrapped, format!("HEAD\n{}\nTAIL", EXPECTED_BODY));
    assert_eq!(module.code_units, 2);
}

#[test]
fn test_wrapper_is_not_concatenated() {
    let (_temp, ctx) = create_test_project();
    let sources = SourceSet::discover(&ctx).unwrap();
    assert!(sources.code.paths().iter().all(|p| !p.ends_with(".wrapper.js")));
}

#[test]
fn test_unwrap_recovers_body_from_output() {
    let (temp, ctx) = create_test_project();
    let production = BuildPipeline::new(ctx).produce().unwrap();

    let script = &production.artifacts[0];
    let banner_end = script.content.find("*/\n").unwrap() + 3;
    let wrapper = ModuleWrapper::load(&temp.path().join("src/js/.wrapper.js"), "@@js").unwrap();
    assert_eq!(wrapper.unwrap_body(&script.content[banner_end..]), Some(EXPECTED_BODY));
}

// ============================================================================
// Pipeline Integration Tests
// ============================================================================

#[test]
fn test_full_build_writes_banner_stamped_artifacts() {
    let (temp, ctx) = create_test_project();
    let result = BuildPipeline::new(ctx).build().unwrap();

    assert_eq!(result.built_count(), 2);
    assert_eq!(result.version, "3.9.0");

    let js = fs::read_to_string(temp.path().join("dist/viewer.js")).unwrap();
    assert!(js.starts_with("/*!\n * viewer 3.9.0\n"));
    assert!(js.ends_with(&format!("*/\nHEAD\n{}\nTAIL", EXPECTED_BODY)));
    assert_eq!(js.matches(" * viewer 3.9.0").count(), 1);

    let min = fs::read_to_string(temp.path().join("dist/viewer.min.js")).unwrap();
    assert_eq!(min.matches(" * viewer 3.9.0").count(), 1);
    assert!(min.len() < js.len());
}

#[test]
fn test_title_and_tag_in_banner() {
    let (temp, ctx) = create_test_project();
    let mut config = ctx.config().clone();
    config.project.title = Some("Photo Sphere Viewer".to_string());
    let ctx = BuildContext::new(config, temp.path().to_path_buf()).with_tag(Some("4.0.0".to_string()));

    BuildPipeline::new(ctx).build().unwrap();

    let js = fs::read_to_string(temp.path().join("dist/viewer.js")).unwrap();
    assert!(js.starts_with("/*!\n * Photo Sphere Viewer 4.0.0\n"));
}

#[test]
fn test_precedence_overrides_alphabetical_order() {
    let (temp, ctx) = create_test_project();
    let mut config = ctx.config().clone();
    config.scripts.precedence = vec!["js/B.js".to_string()];
    let ctx = BuildContext::new(config, temp.path().to_path_buf());

    let sources = SourceSet::discover(&ctx).unwrap();
    let module = assemble_module(&ctx, &sources).unwrap();
    assert!(module.body.starts_with("var B=2;\n\nvar A=1;"));
}

#[test]
fn test_failed_build_leaves_previous_outputs() {
    let (temp, ctx) = create_test_project();
    BuildPipeline::new(ctx.clone()).build().unwrap();
    let before = fs::read_to_string(temp.path().join("dist/viewer.js")).unwrap();

    create_test_file(temp.path(), "src/js/B.js", "function broken() { return (1; }");
    let err = BuildPipeline::new(ctx).build().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transform);
    assert_eq!(fs::read_to_string(temp.path().join("dist/viewer.js")).unwrap(), before);
}

#[test]
fn test_missing_source_dir_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    let ctx = BuildContext::new(default_config(), temp.path().to_path_buf());

    let err = BuildPipeline::new(ctx).build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.kind().exit_code(), 2);
}

#[test]
fn test_stylesheet_chain() {
    let (temp, ctx) = create_test_project();
    create_test_file(temp.path(), "src/scss/_buttons.scss", ".psv-button { user-select: none; }\n");
    create_test_file(
        temp.path(),
        "src/scss/viewer.scss",
        "@import 'buttons';\n$bg: #222;\n.psv-container { background: $bg; .psv-loader { width: 10px; } }\n",
    );
    let mut config = ctx.config().clone();
    config.styles = Some(StylesConfig {
        entry: "scss/viewer.scss".into(),
        browsers: vec!["safari >= 10".to_string()],
    });
    let ctx = BuildContext::new(config, temp.path().to_path_buf()).with_filter(vec!["style-min".to_string()]);

    let result = BuildPipeline::new(ctx).build().unwrap();
    assert_eq!(result.built_count(), 1);
    assert!(!temp.path().join(format!("dist/{}", TargetKind::Stylesheet.file_name("viewer"))).exists());

    let min = fs::read_to_string(temp.path().join("dist/viewer.min.css")).unwrap();
    assert!(min.starts_with("/*!\n"));
    assert!(min.contains("-webkit-user-select:none"));
    assert!(min.contains(".psv-container .psv-loader{width:10px}"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_build_from_ship_toml() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    create_test_file(
        root,
        "ship.toml",
        r#"
[project]
name = "widget"
src = "lib"
out = "out"

[scripts]
precedence = ["core.js"]
catch_all = "*.js"
wrapper = "wrap.tpl"
marker = "//BODY"
separator = "\n"

[icons]
sources = ["svg/*.svg"]
namespace = "Widget.icons"

[banner]
template = "/* {{name}} v{{version}} */"
"#,
    );
    create_test_file(root, "lib/wrap.tpl", "(function(){\n//BODY\n})();\n");
    create_test_file(root, "lib/core.js", "var core = {};");
    create_test_file(root, "lib/extra.js", "core.extra = 1;");
    create_test_file(root, "lib/svg/x.svg", "<svg it's/>");

    let config = load_config(Some(&root.join("ship.toml"))).unwrap();
    let ctx = BuildContext::new(config, root.to_path_buf());
    BuildPipeline::new(ctx).build().unwrap();

    let js = fs::read_to_string(root.join("out/widget.js")).unwrap();
    assert_eq!(
        js,
        "/* widget v0.1.0 */\n(function(){\nvar core = {};\ncore.extra = 1;\nWidget.icons['x.svg'] = '<svg it\\'s/>';\n})();\n"
    );
}
