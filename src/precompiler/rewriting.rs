//! Rewrite stages
//!
//! Each stage is a pure `text -> text` function behind [`RewriteStage`]. The
//! block-based stages classify their input with a stage-specific
//! [`ConstructMatcher`](crate::precompiler::lexing::ConstructMatcher) and only
//! touch the construct blocks, which keeps comments and string literals
//! intact. The doc-comment stage is the exception that targets comments.
//!
//! Apart from line-number bookkeeping inside a replaced construct, no stage
//! adds or removes line breaks: a stage's output has as many newlines as its
//! input.

pub mod annotation;
pub mod doc_log;
pub mod stage;
pub mod visibility;
pub mod wrap;

pub use annotation::AnnotationRewriter;
pub use doc_log::DocLogTransformer;
pub use stage::RewriteStage;
pub use visibility::{AccessLabelMatcher, VisibilityNormalizer};
