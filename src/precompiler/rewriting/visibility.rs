//! Access-label normalization
//!
//! Rewrites `private:` style labels in code so instrumentation can reach
//! every member. Only the label text changes; the character in front of the
//! label and the whitespace before the colon are kept as they were.

use super::stage::{rewrite_constructs, RewriteStage};
use crate::precompiler::error::StageError;
use crate::precompiler::lexing::{ConstructMatch, ConstructMatcher};
use crate::precompiler::settings::VisibilitySettings;

/// Finds `<non-identifier char><label><whitespace>*:`.
///
/// Capture groups: 1 the leading character, 2 the label, 3 the whitespace
/// and colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLabelMatcher {
    label: String,
}

impl AccessLabelMatcher {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn match_label_at(&self, text: &str, start: usize, label_start: usize) -> Option<ConstructMatch> {
        let lead = text[..label_start].chars().next_back()?;
        let lead_start = label_start - lead.len_utf8();
        if lead_start < start || is_identifier_char(lead) {
            return None;
        }

        let label_end = label_start + self.label.len();
        let rest = &text[label_end..];
        let whitespace = rest.len() - rest.trim_start().len();
        if !rest[whitespace..].starts_with(':') {
            return None;
        }
        let end = label_end + whitespace + 1;

        Some(ConstructMatch {
            span: lead_start..end,
            groups: vec![
                Some(lead_start..end),
                Some(lead_start..label_start),
                Some(label_start..label_end),
                Some(label_end..end),
            ],
        })
    }
}

impl ConstructMatcher for AccessLabelMatcher {
    fn find_at(&self, text: &str, start: usize) -> Option<ConstructMatch> {
        let step = self.label.chars().next()?.len_utf8();
        let mut search = start;
        while search < text.len() {
            let label_start = search + text[search..].find(&self.label)?;
            if let Some(found) = self.match_label_at(text, start, label_start) {
                return Some(found);
            }
            search = label_start + step;
        }
        None
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Rewrites one access label into another, in code only.
#[derive(Debug, Clone)]
pub struct VisibilityNormalizer {
    matcher: AccessLabelMatcher,
    replacement: String,
}

impl VisibilityNormalizer {
    pub fn new(settings: &VisibilitySettings) -> Self {
        Self {
            matcher: AccessLabelMatcher::new(settings.from.clone()),
            replacement: settings.to.clone(),
        }
    }
}

impl RewriteStage for VisibilityNormalizer {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn rewrite(&self, text: &str) -> Result<String, StageError> {
        rewrite_constructs(self.name(), text, &self.matcher, |block, out| {
            out.push_str(block.capture(1).unwrap_or_default());
            out.push_str(&self.replacement);
            out.push_str(block.capture(3).unwrap_or_default());
        })
    }
}
