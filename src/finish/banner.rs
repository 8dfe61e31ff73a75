//! License banner rendering.

use chrono::Datelike;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*(name|version|year)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// A rendered license banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
}

impl Banner {
    /// Render a banner template for the current year.
    pub fn render(template: &str, name: &str, version: &str) -> Self {
        Self::render_for_year(template, name, version, chrono::Local::now().year())
    }

    /// Render a banner template.
    ///
    /// `{{name}}`, `{{version}}` and `{{year}}` are substituted; any other
    /// text, including unknown placeholders, is kept as written.
    pub fn render_for_year(template: &str, name: &str, version: &str, year: i32) -> Self {
        let text = placeholder()
            .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
                "name" => name.to_string(),
                "version" => version.to_string(),
                _ => year.to_string(),
            })
            .into_owned();
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Prepend the banner and a line break to an artifact.
///
/// Not idempotent: a second application adds a second banner.
pub fn prepend_banner(banner: &Banner, content: &str) -> String {
    let mut out = String::with_capacity(banner.text.len() + 1 + content.len());
    out.push_str(&banner.text);
    out.push('\n');
    out.push_str(content);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "/*!\n * {{name}} {{version}}\n * (c) 2015-{{ year }}\n */";

    #[test]
    fn test_render_substitutes_placeholders() {
        let banner = Banner::render_for_year(TEMPLATE, "Photo Sphere Viewer", "4.0.0", 2026);
        assert_eq!(banner.text(), "/*!\n * Photo Sphere Viewer 4.0.0\n * (c) 2015-2026\n */");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let banner = Banner::render_for_year("{{author}} {{name}}", "x", "1", 2026);
        assert_eq!(banner.text(), "{{author}} x");
    }

    #[test]
    fn test_render_uses_current_year() {
        let before = chrono::Local::now().year();
        let banner = Banner::render("{{year}}", "x", "1");
        let after = chrono::Local::now().year();
        let year: i32 = banner.text().parse().unwrap();
        assert!(year == before || year == after);
    }

    #[test]
    fn test_prepend_banner() {
        let banner = Banner::render_for_year("/* b */", "x", "1", 2026);
        assert_eq!(prepend_banner(&banner, "var a;"), "/* b */\nvar a;");
    }

    #[test]
    fn test_double_banner_appears_twice() {
        let banner = Banner::render_for_year(TEMPLATE, "PSV", "1.0.0", 2026);
        let twice = prepend_banner(&banner, &prepend_banner(&banner, "x"));
        assert_eq!(twice.matches(banner.text()).count(), 2);
    }
}
