//! Recursive header inlining

use super::include::{is_pragma_once, IncludeDirective};
use super::search::{absolutize, SearchPaths};
use super::session::{IncludeSite, MergeReport, MergeSession};
use crate::precompiler::error::MergeError;
use crate::precompiler::settings::MarkerSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of merging one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    pub text: String,
    pub report: MergeReport,
}

/// Inlines every resolvable include of a root file into one stream.
///
/// The stream starts with an origin define naming the root file. Every file
/// (the root included) starts with `#line 1 "<file>"`, and after each inlined
/// header the parent's numbering is restored with a `#line` directive, so
/// diagnostics from the downstream compiler point at the original sources.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMerger<'a> {
    search: &'a SearchPaths,
    markers: &'a MarkerSettings,
}

impl<'a> HeaderMerger<'a> {
    pub fn new(search: &'a SearchPaths, markers: &'a MarkerSettings) -> Self {
        Self { search, markers }
    }

    /// Read `root` and merge it.
    pub fn merge(&self, root: &Path) -> Result<MergeOutput, MergeError> {
        let cwd = std::env::current_dir().map_err(MergeError::WorkingDirectory)?;
        let root = absolutize(root, &cwd);
        let source = read_source(&root)?;
        self.merge_source(&root, &source)
    }

    /// Merge already-read root `source` that lives at `root`.
    ///
    /// `root` should be absolute; it is what the origin define and the
    /// location directives name.
    pub fn merge_source(&self, root: &Path, source: &str) -> Result<MergeOutput, MergeError> {
        let mut session = MergeSession::new(root);
        session.visit(root);
        session.push_line(&format!(
            "#define {} (\"{}\")",
            self.markers.origin_define,
            escape_path(root)
        ));
        self.resolve_into(&mut session, root, source)?;

        let (text, report) = session.finish();
        Ok(MergeOutput { text, report })
    }

    fn resolve_into(
        &self,
        session: &mut MergeSession,
        current: &Path,
        source: &str,
    ) -> Result<(), MergeError> {
        session.push_line(&line_directive(1, current));

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;

            if is_pragma_once(line) {
                session.push_line(&format!("// {}: #pragma once", self.markers.comment_prefix));
                continue;
            }

            let Some(directive) = IncludeDirective::parse(line, line_number) else {
                session.push_line(line);
                continue;
            };

            let Some(resolved) = self.search.resolve(&directive) else {
                log::debug!(
                    "{}:{}: leaving external include '{}'",
                    current.display(),
                    line_number,
                    directive.target
                );
                session.report_mut().external.push(IncludeSite {
                    file: current.to_path_buf(),
                    directive,
                    resolved: None,
                });
                session.push_line(line);
                continue;
            };

            if !session.visit(&resolved.path) {
                log::debug!(
                    "{}:{}: '{}' already merged",
                    current.display(),
                    line_number,
                    resolved.path.display()
                );
                session.report_mut().elided.push(IncludeSite {
                    file: current.to_path_buf(),
                    directive: resolved.directive,
                    resolved: Some(resolved.path),
                });
                session.push_line("");
                continue;
            }

            log::info!("resolved -> {}", resolved.path.display());
            let header = read_source(&resolved.path)?;
            if header.is_empty() {
                return Err(MergeError::EmptyHeader {
                    path: resolved.path,
                });
            }
            session.report_mut().inlined.push(resolved.path.clone());

            self.resolve_into(session, &resolved.path, &header)?;
            session.push_line(&format!(
                "// {}: end of file {}",
                self.markers.comment_prefix,
                resolved.path.display()
            ));
            session.push_line(&line_directive(line_number + 1, current));
        }

        Ok(())
    }
}

/// Merge `root` with the default marker names.
pub fn merge(root: &Path, search: &SearchPaths) -> Result<String, MergeError> {
    let markers = crate::precompiler::settings::Settings::default().markers;
    HeaderMerger::new(search, &markers)
        .merge(root)
        .map(|output| output.text)
}

fn read_source(path: &Path) -> Result<String, MergeError> {
    fs::read_to_string(path).map_err(|source| MergeError::Read {
        path: PathBuf::from(path),
        source,
    })
}

fn line_directive(line: usize, file: &Path) -> String {
    format!("#line {} \"{}\"", line, escape_path(file))
}

/// Render `path` for use inside a C string literal.
fn escape_path(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precompiler::settings::Settings;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn merge_in(temp: &TempDir, root: &str) -> MergeOutput {
        let markers = Settings::default().markers;
        let search = SearchPaths::new([temp.path()]);
        HeaderMerger::new(&search, &markers)
            .merge(&temp.path().join(root))
            .expect("merge to succeed")
    }

    #[test]
    fn test_file_without_includes_is_prefixed_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.cpp"), "int a;\nint b;\n").unwrap();

        let root = temp.path().join("main.cpp");
        let output = merge_in(&temp, "main.cpp");
        assert_eq!(
            output.text,
            format!(
                "#define PROTEST_ORIGIN_FILE (\"{0}\")\n#line 1 \"{0}\"\nint a;\nint b;",
                root.display()
            )
        );
        assert!(output.report.inlined.is_empty());
    }

    #[test]
    fn test_inlines_header_and_restores_numbering() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.h"), "int from_a;\n").unwrap();
        fs::write(
            temp.path().join("main.cpp"),
            "// top\n#include \"a.h\"\nint after;\n",
        )
        .unwrap();

        let root = temp.path().join("main.cpp");
        let header = temp.path().join("a.h");
        let output = merge_in(&temp, "main.cpp");
        let expected = [
            format!("#define PROTEST_ORIGIN_FILE (\"{}\")", root.display()),
            format!("#line 1 \"{}\"", root.display()),
            "// top".to_string(),
            format!("#line 1 \"{}\"", header.display()),
            "int from_a;".to_string(),
            format!("// PROTEST: end of file {}", header.display()),
            format!("#line 3 \"{}\"", root.display()),
            "int after;".to_string(),
        ]
        .join("\n");
        assert_eq!(output.text, expected);
        assert_eq!(output.report.inlined, vec![header]);
    }

    #[test]
    fn test_pragma_once_is_neutralised() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.cpp"), "  #pragma once\nint a;").unwrap();
        let output = merge_in(&temp, "main.cpp");
        assert!(output.text.contains("\n// PROTEST: #pragma once\nint a;"));
    }

    #[test]
    fn test_external_include_is_kept_verbatim() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.cpp"), "#include <vector>\n").unwrap();
        let output = merge_in(&temp, "main.cpp");
        assert!(output.text.ends_with("\n#include <vector>"));
        assert_eq!(output.report.external.len(), 1);
        assert_eq!(output.report.external[0].directive.target, "vector");
    }

    #[test]
    fn test_duplicate_include_becomes_blank_line() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.h"), "int from_a;").unwrap();
        fs::write(
            temp.path().join("main.cpp"),
            "#include \"a.h\"\n#include \"a.h\"\nint z;",
        )
        .unwrap();
        let root = temp.path().join("main.cpp");
        let output = merge_in(&temp, "main.cpp");
        assert_eq!(output.text.matches("int from_a;").count(), 1);
        assert!(output
            .text
            .ends_with(&format!("#line 2 \"{}\"\n\nint z;", root.display())));
        assert_eq!(output.report.elided.len(), 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let markers = Settings::default().markers;
        let search = SearchPaths::default();
        let err = HeaderMerger::new(&search, &markers)
            .merge(&temp.path().join("missing.cpp"))
            .unwrap_err();
        assert!(matches!(err, MergeError::Read { .. }));
    }

    #[test]
    fn test_empty_header_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("empty.h"), "").unwrap();
        fs::write(temp.path().join("main.cpp"), "#include \"empty.h\"").unwrap();
        let markers = Settings::default().markers;
        let search = SearchPaths::new([temp.path()]);
        let err = HeaderMerger::new(&search, &markers)
            .merge(&temp.path().join("main.cpp"))
            .unwrap_err();
        assert!(matches!(err, MergeError::EmptyHeader { .. }));
    }

    #[test]
    fn test_invalid_utf8_header_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.h"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(temp.path().join("main.cpp"), "#include \"bad.h\"").unwrap();
        let markers = Settings::default().markers;
        let search = SearchPaths::new([temp.path()]);
        let err = HeaderMerger::new(&search, &markers)
            .merge(&temp.path().join("main.cpp"))
            .unwrap_err();
        assert!(matches!(err, MergeError::Read { .. }));
    }

    #[test]
    fn test_custom_marker_names() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.cpp"), "#pragma once").unwrap();
        let markers = MarkerSettings {
            origin_define: "ORIGIN".into(),
            comment_prefix: "PRE".into(),
        };
        let search = SearchPaths::default();
        let output = HeaderMerger::new(&search, &markers)
            .merge(&temp.path().join("main.cpp"))
            .unwrap();
        assert!(output.text.starts_with("#define ORIGIN (\""));
        assert!(output.text.ends_with("// PRE: #pragma once"));
    }

    #[test]
    fn test_escape_path() {
        assert_eq!(escape_path(Path::new("/a/b.cpp")), "/a/b.cpp");
        assert_eq!(escape_path(Path::new("/a \"q\"")), "/a \\\"q\\\"");
    }
}
