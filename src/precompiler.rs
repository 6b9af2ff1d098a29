//! Main module for precompiler library functionality

pub mod error;
pub mod lexing;
pub mod merging;
pub mod pipeline;
pub mod rewriting;
pub mod settings;
