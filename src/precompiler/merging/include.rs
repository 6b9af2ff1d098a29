//! Include directive recognition

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static INCLUDE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*#\s*include\s+(["<])([^">]+)[">]\s*$"#).expect("valid include pattern")
});

/// Which delimiter opened the include path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludeForm {
    /// `#include "path"`
    Quoted,
    /// `#include <path>`
    Angled,
}

/// An include directive found on a single line of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeDirective {
    pub target: String,
    pub form: IncludeForm,
    /// 1-based line number within the file that contains the directive
    pub line: usize,
}

impl IncludeDirective {
    /// Parse `line` as an include directive.
    ///
    /// The whole line has to be the directive; surrounding whitespace is
    /// allowed. Closing and opening delimiters are not required to agree.
    pub fn parse(line: &str, line_number: usize) -> Option<Self> {
        let captures = INCLUDE_REGEX.captures(line)?;
        let form = match &captures[1] {
            "<" => IncludeForm::Angled,
            _ => IncludeForm::Quoted,
        };
        Some(IncludeDirective {
            target: captures[2].to_string(),
            form,
            line: line_number,
        })
    }
}

/// True for a `#pragma once` line.
pub fn is_pragma_once(line: &str) -> bool {
    line.trim().starts_with("#pragma once")
}
