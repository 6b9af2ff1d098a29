//! `[[attribute]]` to compiler annotation rewriting

use super::stage::{rewrite_constructs, RewriteStage};
use crate::precompiler::error::StageError;
use crate::precompiler::lexing::count_newlines;
use crate::precompiler::settings::AnnotationSettings;
use once_cell::sync::Lazy;
use regex::Regex;

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]*)\]\]").expect("valid annotation pattern"));

/// Turns `[[x]]` into `WRAPPER([[attribute("x")]])`.
///
/// The payload loses its spaces and newlines and has its double quotes
/// escaped. Newlines removed from a multi-line annotation are re-emitted
/// after the replacement.
#[derive(Debug, Clone)]
pub struct AnnotationRewriter {
    wrapper: String,
    attribute: String,
}

impl AnnotationRewriter {
    pub fn new(settings: &AnnotationSettings) -> Self {
        Self {
            wrapper: settings.wrapper.clone(),
            attribute: settings.attribute.clone(),
        }
    }

    fn replacement(&self, inner: &str) -> String {
        let payload = inner
            .replace('\n', "")
            .replace(' ', "")
            .replace('"', "\\\"");
        let mut out = format!(
            "{}([[{}(\"{}\")]])",
            self.wrapper, self.attribute, payload
        );
        out.push_str(&"\n".repeat(count_newlines(inner)));
        out
    }
}

impl RewriteStage for AnnotationRewriter {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn rewrite(&self, text: &str) -> Result<String, StageError> {
        rewrite_constructs(self.name(), text, &*ANNOTATION, |block, out| {
            out.push_str(&self.replacement(block.capture(1).unwrap_or_default()));
        })
    }
}
