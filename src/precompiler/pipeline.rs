//! Pipeline orchestration
//!
//! A pipeline is an ordered list of rewrite stages run over the output of
//! the header merge. The named pipelines live in a [`PipelineRegistry`];
//! [`PipelineExecutor`] looks one up, merges the root file and threads the
//! text through the stages in order.

pub mod config;
pub mod executor;

pub use config::{PipelineRegistry, PipelineSpec, StageId};
pub use executor::{ExecutionOutput, PipelineExecutor};
