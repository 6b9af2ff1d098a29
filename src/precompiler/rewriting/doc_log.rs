//! Doc-comment to log statement transformer
//!
//! A block comment of the shape
//!
//! ```text
//! /** @info(format)
//!  * Some text that is wrapped
//!  * @separator
//!  */
//! ```
//!
//! is replaced by one `logger() << "..." << "\n";` statement carrying the
//! cleaned-up comment body, followed by as many newlines as the comment had
//! so that later lines keep their numbers. The `(format)` flag re-flows the
//! body paragraph by paragraph to the configured line length.
//!
//! Whitespace in front of the comment on its line is dropped along with it.
//! Block comments that do not carry the tag stay untouched.

use super::stage::RewriteStage;
use super::wrap::wrap_paragraphs;
use crate::precompiler::error::StageError;
use crate::precompiler::lexing::{classify, count_newlines, BlockKind, NoConstruct};
use crate::precompiler::settings::DocLogSettings;
use once_cell::sync::Lazy;
use regex::Regex;

static DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\*[ \t]*").expect("valid decoration pattern"));

/// A tagged comment pulled apart into its body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedComment<'a> {
    formatted: bool,
    /// Lines between the tag line and the closing line, undecorated
    body: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct DocLogTransformer {
    settings: DocLogSettings,
}

impl DocLogTransformer {
    pub fn new(settings: &DocLogSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn parse<'a>(&self, comment: &'a str) -> Option<TaggedComment<'a>> {
        let rest = comment
            .strip_prefix("/** ")?
            .strip_prefix(self.settings.tag.as_str())?;
        let (formatted, rest) = match rest.strip_prefix('(') {
            Some(flagged) => {
                let rest = flagged
                    .strip_prefix(self.settings.format_flag.as_str())?
                    .strip_prefix(')')?;
                (true, rest)
            }
            None => (false, rest),
        };
        let rest = rest.strip_prefix('\r').unwrap_or(rest);
        rest.strip_prefix('\n')?;
        if !comment.ends_with("*/") {
            return None;
        }

        let lines: Vec<&str> = comment.split('\n').collect();
        let body = lines[1..lines.len() - 1]
            .iter()
            .map(|line| undecorate(line))
            .collect();
        Some(TaggedComment { formatted, body })
    }

    /// The log statement for `comment`, without the trailing padding.
    fn statement(&self, comment: &TaggedComment<'_>) -> String {
        let rule = "-".repeat(self.settings.line_length);
        let lines: Vec<String> = comment
            .body
            .iter()
            .map(|line| {
                if self.settings.separator_tags.iter().any(|tag| tag == line) {
                    rule.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();

        let lines = if comment.formatted {
            wrap_paragraphs(&lines, self.settings.line_length)
        } else {
            lines
        };

        format!(
            "{} << \"{}\" << \"\\n\";",
            self.settings.sink,
            lines.join("\\n")
        )
    }
}

fn undecorate(line: &str) -> &str {
    match DECORATION.find(line) {
        Some(found) => line[found.end()..].trim(),
        None => line.trim(),
    }
}

impl RewriteStage for DocLogTransformer {
    fn name(&self) -> &'static str {
        "doc-log"
    }

    fn rewrite(&self, text: &str) -> Result<String, StageError> {
        let blocks = classify(text, &NoConstruct).map_err(|source| StageError {
            stage: self.name(),
            source,
        })?;

        let mut output = String::with_capacity(text.len());
        for block in &blocks {
            let tagged = match block.kind {
                BlockKind::BlockComment => self.parse(block.text),
                _ => None,
            };
            let Some(tagged) = tagged else {
                output.push_str(block.text);
                continue;
            };

            log::trace!("doc-log: rewriting comment at {:?}", block.span);
            let kept = output.trim_end_matches([' ', '\t']).len();
            output.truncate(kept);
            output.push_str(&self.statement(&tagged));
            output.push_str(&"\n".repeat(count_newlines(block.text)));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precompiler::settings::Settings;
    use pretty_assertions::assert_eq;

    fn transform_with(settings: &DocLogSettings, text: &str) -> String {
        DocLogTransformer::new(settings).rewrite(text).unwrap()
    }

    fn transform(text: &str) -> String {
        transform_with(&Settings::default().doc_log, text)
    }

    #[test]
    fn test_plain_comment_becomes_log_statement() {
        let input = "int a;\n/** @info\n * first line\n * second line\n */\nint b;";
        assert_eq!(
            transform(input),
            "int a;\nlogger() << \"first line\\nsecond line\" << \"\\n\";\n\n\n\nint b;"
        );
    }

    #[test]
    fn test_newline_count_is_preserved() {
        let input = "  /** @info(format)\n   * a b c\n   *\n   * d\n   */\nx";
        let output = transform(input);
        assert_eq!(count_newlines(&output), count_newlines(input));
        assert!(output.ends_with("\nx"));
    }

    #[test]
    fn test_leading_indentation_is_dropped() {
        let output = transform("\t  /** @info\n * hi\n */");
        insta::assert_snapshot!(output.lines().next().unwrap(), @r#"logger() << "hi" << "\n";"#);
    }

    #[test]
    fn test_separator_becomes_rule() {
        let mut settings = Settings::default().doc_log;
        settings.line_length = 5;
        for tag in ["@seperator", "@separator"] {
            let input = format!("/** @info\n * {}\n */", tag);
            assert_eq!(
                transform_with(&settings, &input),
                "logger() << \"-----\" << \"\\n\";\n\n"
            );
        }
    }

    #[test]
    fn test_format_flag_wraps_paragraphs() {
        let mut settings = Settings::default().doc_log;
        settings.line_length = 12;
        let input = "/** @info(format)\n * Hello world this is a line\n *\n * next\n */";
        let output = transform_with(&settings, input);
        insta::assert_snapshot!(
            output.lines().next().unwrap(),
            @r#"logger() << "Hello world\nthis is a\nline\n\nnext" << "\n";"#
        );
    }

    #[test]
    fn test_without_format_flag_lines_are_not_wrapped() {
        let mut settings = Settings::default().doc_log;
        settings.line_length = 4;
        let output = transform_with(&settings, "/** @info\n * one two three\n */");
        assert!(output.starts_with("logger() << \"one two three\" << "));
    }

    #[test]
    fn test_every_tagged_comment_is_rewritten() {
        let input = "/** @info\n * a\n */\n/** @info\n * b\n */";
        let output = transform(input);
        assert_eq!(output.matches("logger()").count(), 2);
        assert_eq!(count_newlines(&output), count_newlines(input));
    }

    #[test]
    fn test_crlf_after_tag_is_accepted() {
        let output = transform("/** @info\r\n * hi\r\n */");
        assert!(output.starts_with("logger() << \"hi\" << "));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(transform("/** @info\n*/"), "logger() << \"\" << \"\\n\";\n");
    }

    #[rstest::rstest]
    #[case("/** @info */")]
    #[case("/** @infox\n */")]
    #[case("/** @info(other)\n */")]
    #[case("/* @info\n */")]
    #[case("/** plain docs\n */")]
    #[case("// /** @info\n")]
    #[case("const char *s = \"/** @info\\n */\";")]
    #[case("/** @info\n never closed")]
    fn test_untagged_text_is_untouched(#[case] input: &str) {
        assert_eq!(transform(input), input);
    }

    #[test]
    fn test_custom_sink_and_tag() {
        let mut settings = Settings::default().doc_log;
        settings.sink = "std::cout".into();
        settings.tag = "@log".into();
        let output = transform_with(&settings, "/** @log\n * x\n */");
        assert!(output.starts_with("std::cout << \"x\" << \"\\n\";"));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = DocLogTransformer::new(&Settings::default().doc_log)
            .rewrite("\"open\\\"")
            .unwrap_err();
        assert_eq!(err.stage, "doc-log");
    }
}
