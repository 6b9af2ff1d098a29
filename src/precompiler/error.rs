//! Error types shared across the precompiler
//!
//! Every failure inside the tool is fatal for the translation unit being
//! processed. Soft conditions (an include that cannot be resolved) are not
//! errors and never reach this module.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while layering or deserializing configuration
pub type SettingsError = config::ConfigError;

/// Errors raised while splitting text into lexical blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// A string literal reached end of input before its closing quote.
    #[error("unterminated string literal starting at line {line} (byte {offset})")]
    UnterminatedString { offset: usize, line: usize },
}

/// Errors raised by the header merge resolver
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("included header '{}' is empty", path.display())]
    EmptyHeader { path: PathBuf },

    #[error("failed to determine the current working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
}

/// A rewrite stage could not process its input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stage '{stage}' failed: {source}")]
pub struct StageError {
    pub stage: &'static str,
    #[source]
    pub source: ClassifyError,
}

/// Errors surfaced by the pipeline executor
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline '{0}' not found")]
    UnknownPipeline(String),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize merge report: {0}")]
    Report(#[from] serde_json::Error),
}
