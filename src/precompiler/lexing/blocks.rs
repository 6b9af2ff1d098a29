//! Lexical block types produced by the classifier

use std::fmt;
use std::ops::Range;

/// The kind of a classified span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Text outside of every other kind. The text after the last explicit
    /// block is also reported as `Code`.
    Code,
    BlockComment,
    /// A `//` comment including its terminating newline.
    LineComment,
    StringLiteral,
    /// A stage-specific match, see [`ConstructMatcher`](super::ConstructMatcher).
    Construct,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Code => "code",
            BlockKind::BlockComment => "block-comment",
            BlockKind::LineComment => "line-comment",
            BlockKind::StringLiteral => "string-literal",
            BlockKind::Construct => "construct",
        };
        f.write_str(name)
    }
}

/// A contiguous, non-empty span of the classified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalBlock<'a> {
    pub kind: BlockKind,
    pub span: Range<usize>,
    pub text: &'a str,
    /// Capture groups of a `Construct` block; index 0 is the whole match.
    /// Empty for every other kind.
    captures: Vec<Option<&'a str>>,
}

impl<'a> LexicalBlock<'a> {
    pub(crate) fn new(kind: BlockKind, span: Range<usize>, source: &'a str) -> Self {
        let text = &source[span.clone()];
        LexicalBlock {
            kind,
            span,
            text,
            captures: Vec::new(),
        }
    }

    pub(crate) fn construct(
        span: Range<usize>,
        groups: &[Option<Range<usize>>],
        source: &'a str,
    ) -> Self {
        let captures = groups
            .iter()
            .map(|group| group.clone().map(|range| &source[range]))
            .collect();
        LexicalBlock {
            captures,
            ..LexicalBlock::new(BlockKind::Construct, span, source)
        }
    }

    /// Capture group `index` of a construct block, if it participated.
    pub fn capture(&self, index: usize) -> Option<&'a str> {
        self.captures.get(index).copied().flatten()
    }

    pub fn is(&self, kind: BlockKind) -> bool {
        self.kind == kind
    }
}
