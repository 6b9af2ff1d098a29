//! Marker tokens for each classifier mode
//!
//! The classifier is a small state machine with the modes code, block
//! comment, line comment and string literal. Each mode has its own logos
//! token enum, so a lexer only ever recognises the markers that can change
//! state from that mode: `/*`, `//` and `"` in code, `*/` in a block comment,
//! the newline in a line comment, and `"` or a backslash escape inside a
//! string literal. Every enum has a catch-all `Text` variant so all input is
//! covered and nothing is skipped.

use logos::Logos;

/// Tokens seen while scanning plain code.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeToken {
    #[token("/*")]
    BlockCommentOpen,

    #[token("//")]
    LineCommentOpen,

    #[token("\"")]
    Quote,

    /// A slash that does not start a comment
    #[token("/")]
    Slash,

    #[regex(r#"[^/"]+"#)]
    Text,
}

/// Tokens seen inside a block comment.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCommentToken {
    #[token("*/")]
    Close,

    #[token("*")]
    Star,

    #[regex(r"[^*]+")]
    Text,
}

/// Tokens seen inside a line comment.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommentToken {
    #[token("\n")]
    Newline,

    #[regex(r"[^\n]+")]
    Text,
}

/// Tokens seen inside a string literal.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringToken {
    #[token("\"")]
    Quote,

    /// A backslash and the character it escapes, newline included
    #[regex(r"\\[^\n]")]
    #[token("\\\n")]
    Escape,

    /// A backslash with nothing left to escape (end of input)
    #[token("\\")]
    DanglingBackslash,

    #[regex(r#"[^"\\]+"#)]
    Text,
}

/// The markers that switch the classifier out of code mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeMarker {
    BlockComment,
    LineComment,
    StringLiteral,
}

/// Find the first state-changing marker at or after `start`.
///
/// Returns the marker together with its absolute byte offset.
pub fn next_code_marker(text: &str, start: usize) -> Option<(CodeMarker, usize)> {
    let mut lexer = CodeToken::lexer(&text[start..]);
    while let Some(result) = lexer.next() {
        let marker = match result {
            Ok(CodeToken::BlockCommentOpen) => CodeMarker::BlockComment,
            Ok(CodeToken::LineCommentOpen) => CodeMarker::LineComment,
            Ok(CodeToken::Quote) => CodeMarker::StringLiteral,
            Ok(CodeToken::Slash) | Ok(CodeToken::Text) | Err(()) => continue,
        };
        return Some((marker, start + lexer.span().start));
    }
    None
}

/// End offset of a block comment whose opening `/*` sits at `start`.
///
/// An unterminated block comment runs to the end of input.
pub fn block_comment_end(text: &str, start: usize) -> usize {
    let body = start + 2;
    let mut lexer = BlockCommentToken::lexer(&text[body..]);
    while let Some(result) = lexer.next() {
        if let Ok(BlockCommentToken::Close) = result {
            return body + lexer.span().end;
        }
    }
    text.len()
}

/// End offset of a line comment whose opening `//` sits at `start`.
///
/// The terminating newline belongs to the comment. A trailing backslash does
/// not continue the comment onto the next physical line.
pub fn line_comment_end(text: &str, start: usize) -> usize {
    let body = start + 2;
    let mut lexer = LineCommentToken::lexer(&text[body..]);
    while let Some(result) = lexer.next() {
        if let Ok(LineCommentToken::Newline) = result {
            return body + lexer.span().end;
        }
    }
    text.len()
}

/// How a string literal opened at some quote ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEnd {
    /// Closed; the offset just past the closing quote
    Closed(usize),
    /// No closing quote before end of input. The opening quote is not a
    /// string delimiter (it may sit in a character literal such as `'"'`).
    Unclosed,
    /// Input ends right after an escaped quote, `"...\"`
    EscapedQuoteAtEnd,
}

/// Scan the string literal whose opening quote sits at `start`.
pub fn string_literal_end(text: &str, start: usize) -> StringEnd {
    let body = start + 1;
    let mut lexer = StringToken::lexer(&text[body..]);
    let mut escaped_quote_last = false;
    while let Some(result) = lexer.next() {
        match result {
            Ok(StringToken::Quote) => return StringEnd::Closed(body + lexer.span().end),
            Ok(StringToken::Escape) => escaped_quote_last = lexer.slice() == "\\\"",
            Ok(StringToken::DanglingBackslash) | Ok(StringToken::Text) | Err(()) => {
                escaped_quote_last = false
            }
        }
    }
    if escaped_quote_last {
        StringEnd::EscapedQuoteAtEnd
    } else {
        StringEnd::Unclosed
    }
}
