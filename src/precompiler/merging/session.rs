//! Per-merge state: the visited set, the growing output and a report

use super::include::IncludeDirective;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// State for one top-level merge.
///
/// The visited set is global to the whole recursion: a header inlined
/// anywhere is never inlined a second time, whichever branch reaches it.
#[derive(Debug)]
pub struct MergeSession {
    visited: HashSet<PathBuf>,
    output: String,
    started: bool,
    report: MergeReport,
}

/// What a merge did, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub origin: PathBuf,
    /// Headers inlined, in inlining order
    pub inlined: Vec<PathBuf>,
    /// Includes dropped because their header was already inlined
    pub elided: Vec<IncludeSite>,
    /// Includes left verbatim for the compiler to resolve
    pub external: Vec<IncludeSite>,
}

/// Where an include directive was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeSite {
    pub file: PathBuf,
    pub directive: IncludeDirective,
    /// Resolved header, absent for external includes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<PathBuf>,
}

impl MergeSession {
    pub fn new(origin: &Path) -> Self {
        MergeSession {
            visited: HashSet::new(),
            output: String::new(),
            started: false,
            report: MergeReport {
                origin: origin.to_path_buf(),
                ..MergeReport::default()
            },
        }
    }

    /// Mark `path` visited; false if it already was.
    pub fn visit(&mut self, path: &Path) -> bool {
        self.visited.insert(path.to_path_buf())
    }

    /// Start a new output line holding `text`.
    ///
    /// The very first line is written without a leading newline.
    pub(crate) fn push_line(&mut self, text: &str) {
        if self.started {
            self.output.push('\n');
        }
        self.started = true;
        self.output.push_str(text);
    }

    pub(crate) fn report_mut(&mut self) -> &mut MergeReport {
        &mut self.report
    }

    pub fn finish(self) -> (String, MergeReport) {
        (self.output, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_is_idempotent() {
        let mut session = MergeSession::new(Path::new("/src/a.cpp"));
        assert!(session.visit(Path::new("/src/b.h")));
        assert!(!session.visit(Path::new("/src/b.h")));
        assert!(session.visit(Path::new("/src/c.h")));
    }

    #[test]
    fn test_push_line_separates_lines() {
        let mut session = MergeSession::new(Path::new("/a.cpp"));
        session.push_line("");
        session.push_line("two");
        session.push_line("");
        session.push_line("four");
        assert_eq!(session.finish().0, "\ntwo\n\nfour");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let session = MergeSession::new(Path::new("/a.cpp"));
        let (_, report) = session.finish();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["origin"], "/a.cpp");
        assert!(json["inlined"].as_array().unwrap().is_empty());
    }
}
