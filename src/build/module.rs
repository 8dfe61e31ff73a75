//! Module assembly: read, embed, concatenate, wrap.

use crate::build::{
    concat_fragments, embed_resources, BuildContext, Embedding, ModuleWrapper, SourceKind,
    SourceSet,
};
use crate::error::Result;

/// The unminified module and what went into it.
#[derive(Debug, Clone)]
pub struct AssembledModule {
    /// Code fragments followed by embedded icon statements
    pub body: String,
    /// Body spliced into the wrapper template
    pub wrapped: String,
    pub embedding: Embedding,
    /// Number of code units concatenated
    pub code_units: usize,
}

/// Assemble the module for a context from already discovered sources.
///
/// The wrapper template is loaded first so a bad template fails before any
/// source is read.
pub fn assemble_module(ctx: &BuildContext, sources: &SourceSet) -> Result<AssembledModule> {
    let scripts = &ctx.config().scripts;
    let wrapper = ModuleWrapper::load(&ctx.wrapper_path(), &scripts.marker)?;

    let code = sources.code.read_units(SourceKind::Code)?;
    let resources = sources.resources.read_units(SourceKind::Resource)?;
    let embedding = embed_resources(&resources);

    let mut fragments: Vec<String> = code.iter().map(|u| u.content().to_string()).collect();
    fragments.extend(embedding.statements(&ctx.config().icons.namespace));

    let body = concat_fragments(&fragments, &scripts.separator);
    let wrapped = wrapper.wrap(&body);

    tracing::debug!(
        code_units = code.len(),
        icons = embedding.fragments.len(),
        bytes = wrapped.len(),
        "assembled module"
    );

    Ok(AssembledModule { body, wrapped, embedding, code_units: code.len() })
}
