//! Resource embedding.
//!
//! Inline vector icons are turned into single-line JavaScript statements that
//! register the markup under the icon's file name, e.g.
//!
//! ```text
//! PhotoSphereViewer.ICONS['zoom-in.svg'] = '<svg ...>...</svg>';
//! ```

use crate::build::{SourceKind, SourceUnit};
use std::collections::BTreeMap;

/// Code fragment derived from one resource unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFragment {
    /// Registry key (the resource's base file name)
    pub key: String,
    /// Content collapsed to one line and escaped for a single-quoted literal
    pub payload: String,
}

impl EmbeddedFragment {
    /// Derive a fragment from a resource unit.
    pub fn from_unit(unit: &SourceUnit) -> Self {
        debug_assert_eq!(unit.kind(), SourceKind::Resource);
        Self { key: unit.file_name(), payload: escape_literal(&collapse_lines(unit.content())) }
    }

    /// Render the registration statement.
    pub fn render(&self, namespace: &str) -> String {
        format!("{}['{}'] = '{}';", namespace, escape_literal(&self.key), self.payload)
    }
}

/// Remove every line terminator.
pub fn collapse_lines(content: &str) -> String {
    content.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

/// Escape text for use inside a single-quoted JavaScript string literal.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Build-time view of the icon map the generated code populates.
///
/// Keys are looked up exactly as the runtime registry would; a second insert
/// under an existing key replaces the payload, mirroring the generated
/// assignments where the last statement wins.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    icons: BTreeMap<String, String>,
    duplicates: Vec<String>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fragment. Returns the payload it replaced, if any.
    pub fn insert(&mut self, fragment: &EmbeddedFragment) -> Option<String> {
        let previous = self.icons.insert(fragment.key.clone(), fragment.payload.clone());
        if previous.is_some() {
            self.duplicates.push(fragment.key.clone());
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.icons.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Keys registered more than once.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Output of embedding a resource manifest.
#[derive(Debug, Clone, Default)]
pub struct Embedding {
    /// Fragments in resource-manifest order
    pub fragments: Vec<EmbeddedFragment>,
    pub registry: IconRegistry,
}

impl Embedding {
    /// Rendered statements, ready for concatenation after the code units.
    pub fn statements(&self, namespace: &str) -> Vec<String> {
        self.fragments.iter().map(|f| f.render(namespace)).collect()
    }
}

/// Embed every resource unit, in order.
pub fn embed_resources(units: &[SourceUnit]) -> Embedding {
    let mut embedding = Embedding::default();

    for unit in units {
        let fragment = EmbeddedFragment::from_unit(unit);
        if embedding.registry.insert(&fragment).is_some() {
            tracing::warn!(
                key = %fragment.key,
                path = %unit.path().display(),
                "icon key registered twice; the later payload wins"
            );
        }
        embedding.fragments.push(fragment);
    }

    embedding
}
