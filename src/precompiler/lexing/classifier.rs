//! The comment- and string-aware block classifier
//!
//! `classify` walks the text in code mode. At every step it compares the
//! next state-changing marker (from [`next_code_marker`]) with the leftmost
//! stage construct (from the [`ConstructMatcher`]) and takes whichever starts
//! first. When both start at the same offset the priority is block comment,
//! string literal, construct, line comment. A construct is therefore never
//! searched for inside a comment or string: the enclosing block is consumed
//! before the search resumes behind it.

use super::blocks::{BlockKind, LexicalBlock};
use super::markers::{
    block_comment_end, line_comment_end, next_code_marker, string_literal_end, CodeMarker,
    StringEnd,
};
use crate::precompiler::error::ClassifyError;
use regex::Regex;
use std::ops::Range;

/// A stage-specific match returned by a [`ConstructMatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructMatch {
    pub span: Range<usize>,
    /// Capture group ranges, index 0 being the whole match.
    pub groups: Vec<Option<Range<usize>>>,
}

/// Locates the construct a rewrite stage is interested in.
///
/// Implementations return the leftmost match starting at or after `start`.
/// Empty matches are ignored by the classifier.
pub trait ConstructMatcher {
    fn find_at(&self, text: &str, start: usize) -> Option<ConstructMatch>;
}

/// Matcher for stages that only need comments and strings told apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstruct;

impl ConstructMatcher for NoConstruct {
    fn find_at(&self, _text: &str, _start: usize) -> Option<ConstructMatch> {
        None
    }
}

impl ConstructMatcher for Regex {
    fn find_at(&self, text: &str, start: usize) -> Option<ConstructMatch> {
        let captures = self.captures_at(text, start)?;
        let span = captures.get(0)?.range();
        let groups = captures.iter().map(|m| m.map(|m| m.range())).collect();
        Some(ConstructMatch { span, groups })
    }
}

enum Step {
    Marker(CodeMarker, usize),
    Construct(ConstructMatch),
}

/// Split `text` into ordered, non-overlapping blocks that cover it exactly.
pub fn classify<'a, M>(text: &'a str, matcher: &M) -> Result<Vec<LexicalBlock<'a>>, ClassifyError>
where
    M: ConstructMatcher + ?Sized,
{
    let mut blocks = Vec::new();
    let mut pos = 0;
    let mut plain_start = 0;

    // Both lookups stay valid while their result lies at or after `pos`;
    // `Some(None)` caches "nothing left in the rest of the text".
    let mut marker_cache: Option<Option<(CodeMarker, usize)>> = None;
    let mut construct_cache: Option<Option<ConstructMatch>> = None;

    while pos < text.len() {
        let marker = match marker_cache {
            Some(Some((_, at))) if at < pos => None,
            cached => cached,
        }
        .unwrap_or_else(|| next_code_marker(text, pos));
        marker_cache = Some(marker);

        let construct = match construct_cache.take() {
            Some(Some(found)) if found.span.start < pos => None,
            cached => cached,
        }
        .unwrap_or_else(|| {
            matcher
                .find_at(text, pos)
                .filter(|found| !found.span.is_empty())
        });
        construct_cache = Some(construct.clone());

        let step = match (marker, construct) {
            (Some((kind, at)), Some(found))
                if found.span.start < at
                    || (found.span.start == at && kind == CodeMarker::LineComment) =>
            {
                Step::Construct(found)
            }
            (Some((kind, at)), _) => Step::Marker(kind, at),
            (None, Some(found)) => Step::Construct(found),
            (None, None) => break,
        };

        match step {
            Step::Construct(found) => {
                push_code(&mut blocks, text, plain_start..found.span.start);
                pos = found.span.end;
                log::trace!("construct at {:?}", found.span);
                blocks.push(LexicalBlock::construct(found.span, &found.groups, text));
            }
            Step::Marker(kind, at) => {
                let (block_kind, end) = match kind {
                    CodeMarker::BlockComment => (BlockKind::BlockComment, block_comment_end(text, at)),
                    CodeMarker::LineComment => (BlockKind::LineComment, line_comment_end(text, at)),
                    CodeMarker::StringLiteral => match string_literal_end(text, at) {
                        StringEnd::Closed(end) => (BlockKind::StringLiteral, end),
                        StringEnd::Unclosed => {
                            // Stray quote: plain code, keep scanning behind it.
                            pos = at + 1;
                            continue;
                        }
                        StringEnd::EscapedQuoteAtEnd => {
                            return Err(ClassifyError::UnterminatedString {
                                offset: at,
                                line: line_of(text, at),
                            })
                        }
                    },
                };
                push_code(&mut blocks, text, plain_start..at);
                log::trace!("{} at {}..{}", block_kind, at, end);
                blocks.push(LexicalBlock::new(block_kind, at..end, text));
                pos = end;
            }
        }
        plain_start = pos;
    }

    push_code(&mut blocks, text, plain_start..text.len());
    Ok(blocks)
}

fn push_code<'a>(blocks: &mut Vec<LexicalBlock<'a>>, text: &'a str, span: Range<usize>) {
    if !span.is_empty() {
        blocks.push(LexicalBlock::new(BlockKind::Code, span, text));
    }
}

/// 1-based line number of byte `offset`.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static WORD_MATCHER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(secret)").unwrap());
    static ANNOTATION_MATCHER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\[\[([^\]]*)\]\]").unwrap());

    fn kinds(blocks: &[LexicalBlock<'_>]) -> Vec<(BlockKind, String)> {
        blocks
            .iter()
            .map(|block| (block.kind, block.text.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_text_is_a_single_code_block() {
        let blocks = classify("int a = 1;\n", &NoConstruct).unwrap();
        assert_eq!(kinds(&blocks), vec![(BlockKind::Code, "int a = 1;\n".into())]);
    }

    #[test]
    fn test_empty_input_has_no_blocks() {
        assert!(classify("", &NoConstruct).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_blocks_in_order() {
        let text = "a /* b */ \"c\" // d\ne";
        let blocks = classify(text, &NoConstruct).unwrap();
        assert_eq!(
            kinds(&blocks),
            vec![
                (BlockKind::Code, "a ".into()),
                (BlockKind::BlockComment, "/* b */".into()),
                (BlockKind::Code, " ".into()),
                (BlockKind::StringLiteral, "\"c\"".into()),
                (BlockKind::Code, " ".into()),
                (BlockKind::LineComment, "// d\n".into()),
                (BlockKind::Code, "e".into()),
            ]
        );
    }

    #[test]
    fn test_construct_is_not_found_inside_comments_or_strings() {
        let text = "/* secret */ \"secret\" // secret\nsecret";
        let blocks = classify(text, &*WORD_MATCHER).unwrap();
        let constructs: Vec<_> = blocks
            .iter()
            .filter(|block| block.is(BlockKind::Construct))
            .map(|block| block.span.clone())
            .collect();
        assert_eq!(constructs, vec![32..38]);
    }

    #[test]
    fn test_construct_captures_are_exposed() {
        let blocks = classify("a secret b", &*WORD_MATCHER).unwrap();
        assert_eq!(blocks[1].kind, BlockKind::Construct);
        assert_eq!(blocks[1].capture(0), Some("secret"));
        assert_eq!(blocks[1].capture(1), Some("secret"));
        assert_eq!(blocks[1].capture(2), None);
    }

    #[test]
    fn test_construct_may_span_a_string_literal() {
        let matcher = Regex::new(r"\[\[([^\]]*)\]\]").unwrap();
        let text = "[[deprecated(\"old api\")]] void f();";
        let blocks = classify(text, &matcher).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::Construct);
        assert_eq!(blocks[0].text, "[[deprecated(\"old api\")]]");
    }

    #[test]
    fn test_construct_wins_over_line_comment_at_same_offset() {
        let matcher = Regex::new(r"//!").unwrap();
        let blocks = classify("//! doc\n", &matcher).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::Construct);
        assert_eq!(blocks[1].kind, BlockKind::Code);
    }

    #[test]
    fn test_string_wins_over_construct_at_same_offset() {
        let matcher = Regex::new(r#""x"#).unwrap();
        let blocks = classify("\"x\"", &matcher).unwrap();
        assert_eq!(kinds(&blocks), vec![(BlockKind::StringLiteral, "\"x\"".into())]);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let text = r#"s = "a \" // not a comment"; // comment"#;
        let blocks = classify(text, &NoConstruct).unwrap();
        assert_eq!(blocks[1].kind, BlockKind::StringLiteral);
        assert_eq!(blocks[1].text, r#""a \" // not a comment""#);
        assert_eq!(blocks[3].kind, BlockKind::LineComment);
    }

    #[test]
    fn test_comment_markers_inside_string_are_inert() {
        let blocks = classify("\"/* x */\"", &NoConstruct).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::StringLiteral);
    }

    #[test]
    fn test_quote_in_char_literal_is_code() {
        let text = "bool q(char c) { return c == '\"'; }\n[[nodiscard]] int f();\n";
        let blocks = classify(text, &*ANNOTATION_MATCHER).unwrap();
        assert!(blocks.iter().all(|block| !block.is(BlockKind::StringLiteral)));
        let construct = blocks.iter().find(|block| block.is(BlockKind::Construct)).unwrap();
        assert_eq!(construct.text, "[[nodiscard]]");
    }

    #[test]
    fn test_trailing_unclosed_quote_is_code() {
        let text = "char q = '\"';\nconst char *s = \"abc\";\n";
        let blocks = classify(text, &NoConstruct).unwrap();
        let strings: Vec<_> = blocks
            .iter()
            .filter(|block| block.is(BlockKind::StringLiteral))
            .map(|block| block.text)
            .collect();
        assert_eq!(strings, vec!["\"';\nconst char *s = \""]);
        let joined: String = blocks.iter().map(|block| block.text).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_escaped_quote_at_end_is_an_error() {
        let err = classify("int a;\nchar *s = \"abc\\\"", &NoConstruct).unwrap_err();
        assert_eq!(err, ClassifyError::UnterminatedString { offset: 17, line: 2 });
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let blocks = classify("a /* b", &NoConstruct).unwrap();
        assert_eq!(blocks[1].kind, BlockKind::BlockComment);
        assert_eq!(blocks[1].text, "/* b");
    }

    #[test]
    fn test_blocks_partition_input() {
        let text = "x /* a */ \"b\\\"\" // c\n[[d]] e";
        let blocks = classify(text, &*WORD_MATCHER).unwrap();
        let joined: String = blocks.iter().map(|block| block.text).collect();
        assert_eq!(joined, text);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }
}
