//! Configuration loading for the precompiler.
//!
//! `defaults/precompiler.default.toml` is embedded into every binary so that
//! the documented defaults and runtime behavior stay in sync. Callers layer a
//! user file and CLI overrides on top via [`Loader`] before deserializing
//! into [`Settings`].

use crate::precompiler::error::SettingsError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/precompiler.default.toml");

/// Top-level configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub markers: MarkerSettings,
    pub doc_log: DocLogSettings,
    pub visibility: VisibilitySettings,
    pub annotation: AnnotationSettings,
}

/// Names used for the markers written into the merged stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkerSettings {
    pub origin_define: String,
    pub comment_prefix: String,
}

/// Knobs of the doc-comment-to-log transformer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocLogSettings {
    pub tag: String,
    pub format_flag: String,
    pub separator_tags: Vec<String>,
    pub line_length: usize,
    pub sink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VisibilitySettings {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnnotationSettings {
    pub wrapper: String,
    pub attribute: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            markers: MarkerSettings {
                origin_define: "PROTEST_ORIGIN_FILE".into(),
                comment_prefix: "PROTEST".into(),
            },
            doc_log: DocLogSettings {
                tag: "@info".into(),
                format_flag: "format".into(),
                separator_tags: vec!["@seperator".into(), "@separator".into()],
                line_length: 79,
                sink: "logger()".into(),
            },
            visibility: VisibilitySettings {
                from: "private".into(),
                to: "public".into(),
            },
            annotation: AnnotationSettings {
                wrapper: "PROTEST_HIDE".into(),
                attribute: "clang::annotate".into(),
            },
        }
    }
}

/// Layers settings sources, lowest priority first: the embedded defaults,
/// then every file in the order it was added, then single-key overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file that has to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it is present; a missing file is skipped.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(self, path: &Path, required: bool) -> Self {
        log::debug!("settings: layering {} (required: {})", path.display(), required);
        let source = File::from(path).format(FileFormat::Toml).required(required);
        Self {
            builder: self.builder.add_source(source),
        }
    }

    /// Replace one dotted key such as `doc_log.line_length`.
    pub fn set_override(
        self,
        key: &str,
        value: impl Into<ValueKind>,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            builder: self.builder.set_override(key, value)?,
        })
    }

    pub fn build(self) -> Result<Settings, SettingsError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
