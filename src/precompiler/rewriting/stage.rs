//! The stage interface and the shared construct-rewriting loop

use crate::precompiler::error::StageError;
use crate::precompiler::lexing::{classify, BlockKind, ConstructMatcher, LexicalBlock};

/// A single `text -> text` transformation in a pipeline.
pub trait RewriteStage {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    fn rewrite(&self, text: &str) -> Result<String, StageError>;
}

/// Rebuild `text` block by block, handing every construct to `on_construct`.
///
/// All other blocks are copied verbatim.
pub(crate) fn rewrite_constructs<M, F>(
    stage: &'static str,
    text: &str,
    matcher: &M,
    mut on_construct: F,
) -> Result<String, StageError>
where
    M: ConstructMatcher + ?Sized,
    F: FnMut(&LexicalBlock<'_>, &mut String),
{
    let blocks = classify(text, matcher).map_err(|source| StageError { stage, source })?;
    let mut output = String::with_capacity(text.len());
    for block in &blocks {
        match block.kind {
            BlockKind::Construct => on_construct(block, &mut output),
            _ => output.push_str(block.text),
        }
    }
    Ok(output)
}
