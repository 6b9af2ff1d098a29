//! Lexical block classifier
//!
//! Every rewrite stage has to leave comments and string literals alone (the
//! doc-comment stage is the one that targets comments on purpose). Rather than
//! have each stage re-derive that, the text is split once per stage into
//! [`LexicalBlock`]s that partition it exactly:
//!
//! - block comments, `/*` up to the nearest `*/`
//! - line comments, `//` through the terminating newline
//! - string literals, `"` up to the next unescaped `"`
//! - constructs, whatever the stage's [`ConstructMatcher`] finds in code
//! - code, everything else
//!
//! Structure:
//!     `markers` holds one logos token enum per scanner mode and the functions
//!     that find where a mode ends. `classifier` is the state machine that
//!     drives them and interleaves construct matches.
//!
//! Known limitations:
//!     - A line comment ending in a backslash is not continued onto the next
//!       line; the next line is classified as code.
//!     - Character literals are not recognised. A quote with no closing
//!       quote after it is plain code, but `'"'` followed later by a string
//!       literal pairs with that literal's opening quote.

pub mod blocks;
pub mod classifier;
pub mod markers;

pub use blocks::{BlockKind, LexicalBlock};
pub use classifier::{classify, ConstructMatch, ConstructMatcher, NoConstruct};

/// Number of `\n` characters in `text`.
pub fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
