//! Universal module wrapping.
//!
//! The wrapper template holds the global / AMD / CommonJS preamble and
//! postamble. The pipeline does not care which idiom the consumer ends up
//! using; it only splits the template at the marker line and splices the
//! module body in between.

use crate::error::{Result, ShipError};
use std::fs;
use std::path::Path;

/// A wrapper template split at its marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleWrapper {
    head: String,
    tail: String,
}

impl ModuleWrapper {
    /// Split a template at the single line consisting of `marker`.
    ///
    /// Line endings are normalised to `\n` first. The head ends right before
    /// the marker and the tail starts right after it, so the newline that
    /// followed the marker line begins the tail.
    pub fn parse(template: &str, marker: &str) -> Result<Self> {
        let template = template.replace("\r\n", "\n");

        let mut offsets = Vec::new();
        let mut offset = 0;
        for line in template.split_inclusive('\n') {
            if line.strip_suffix('\n').unwrap_or(line) == marker {
                offsets.push(offset);
            }
            offset += line.len();
        }

        match offsets.as_slice() {
            [start] => Ok(Self {
                head: template[..*start].to_string(),
                tail: template[start + marker.len()..].to_string(),
            }),
            [] => Err(ShipError::config(format!(
                "wrapper template has no line containing the marker '{}'",
                marker
            ))),
            many => Err(ShipError::config(format!(
                "wrapper template contains the marker '{}' on {} lines; expected exactly one",
                marker,
                many.len()
            ))),
        }
    }

    /// Load and split a template file.
    pub fn load(path: &Path, marker: &str) -> Result<Self> {
        let template = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShipError::config(format!("wrapper template not found: {}", path.display()))
            } else {
                ShipError::io(path, e)
            }
        })?;
        Self::parse(&template, marker)
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Splice a module body into the template.
    pub fn wrap(&self, body: &str) -> String {
        let mut out = String::with_capacity(self.head.len() + body.len() + self.tail.len());
        out.push_str(&self.head);
        out.push_str(body);
        out.push_str(&self.tail);
        out
    }

    /// Recover the body from a module produced by [`wrap`](Self::wrap).
    pub fn unwrap_body<'a>(&self, wrapped: &'a str) -> Option<&'a str> {
        if wrapped.len() < self.head.len() + self.tail.len() {
            return None;
        }
        wrapped.strip_prefix(self.head.as_str())?.strip_suffix(self.tail.as_str())
    }
}
