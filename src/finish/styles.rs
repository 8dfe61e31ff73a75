//! Stylesheet compilation, vendor prefixing and minification.
//!
//! SCSS is compiled with `grass`; prefixing and minification go through
//! `lightningcss`, with browser targets taken from browserslist queries.

use crate::error::{Result, ShipError, Stage};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use std::path::Path;

fn stage_error<E: std::fmt::Display>(stage: Stage) -> impl Fn(E) -> ShipError {
    move |e| ShipError::transform(stage, e.to_string())
}

/// Compile an SCSS entry file to expanded CSS.
///
/// Imports are resolved relative to the entry's directory.
pub fn compile_scss(entry: &Path) -> Result<String> {
    if !entry.is_file() {
        return Err(ShipError::config(format!("stylesheet entry not found: {}", entry.display())));
    }

    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    if let Some(dir) = entry.parent() {
        options = options.load_path(dir);
    }

    grass::from_path(entry, &options).map_err(stage_error(Stage::StyleCompile))
}

/// Resolve browserslist queries into lightningcss targets.
///
/// An empty query list means no targets: nothing gets prefixed.
pub fn browser_targets(queries: &[String]) -> Result<Targets> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }

    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str)).map_err(|e| {
        ShipError::config(format!("invalid browser query {:?}: {}", queries.join(", "), e))
    })?;

    Ok(browsers.map(Targets::from).unwrap_or_default())
}

/// Add the vendor prefixes the given browsers need.
///
/// The output is expanded (not minified). Running it on its own output
/// yields the same text.
pub fn prefix_css(css: &str, browsers: &[String]) -> Result<String> {
    let targets = browser_targets(browsers)?;
    print_stylesheet(css, targets, false, Stage::Prefix)
}

/// Minify a stylesheet.
///
/// Prefixes already present are kept.
pub fn minify_css(css: &str) -> Result<String> {
    print_stylesheet(css, Targets::default(), true, Stage::StyleMinify)
}

fn print_stylesheet(css: &str, targets: Targets, minify: bool, stage: Stage) -> Result<String> {
    let mut sheet = StyleSheet::parse(
        css,
        ParserOptions { filename: "stylesheet.css".to_string(), ..ParserOptions::default() },
    )
    .map_err(stage_error(stage))?;

    sheet
        .minify(MinifyOptions { targets, ..MinifyOptions::default() })
        .map_err(stage_error(stage))?;

    let printed = sheet
        .to_css(PrinterOptions { minify, targets, ..PrinterOptions::default() })
        .map_err(stage_error(stage))?;

    Ok(printed.code)
}
