//! File-system part of the documentation task.
//!
//! Cleans the doc site directory and drops the customization script into it.
//! Generating the API pages themselves is left to the doc tool.

use crate::build::BuildContext;
use crate::error::{Result, ShipError};
use std::fs;
use std::path::PathBuf;

/// What `prepare_doc_site` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSite {
    pub dir: PathBuf,
    pub script: PathBuf,
    /// Whether an existing doc directory was removed
    pub cleaned: bool,
}

/// Remove the doc directory and copy the customization script into it.
pub fn prepare_doc_site(ctx: &BuildContext) -> Result<DocSite> {
    let doc = &ctx.config().doc;
    let dir = ctx.resolve_path(&doc.out);
    let source = ctx.resolve_path(&doc.script);

    if !source.is_file() {
        return Err(ShipError::config(format!(
            "doc customization script not found: {}",
            source.display()
        )));
    }

    let cleaned = dir.exists();
    if cleaned {
        fs::remove_dir_all(&dir).map_err(|e| ShipError::io(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "removed doc directory");
    }

    let script = dir.join(&doc.script_dest);
    if let Some(parent) = script.parent() {
        fs::create_dir_all(parent).map_err(|e| ShipError::io(parent, e))?;
    }
    fs::copy(&source, &script).map_err(|e| ShipError::io(&script, e))?;
    tracing::info!(from = %source.display(), to = %script.display(), "copied doc script");

    Ok(DocSite { dir, script, cleaned })
}
