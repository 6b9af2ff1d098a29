//! # precompiler
//!
//! Source-to-source preparation of C/C++ translation units ahead of a real
//! compiler: headers found on the search path are inlined into one stream
//! (with `#line` provenance), and a small set of comment- and string-aware
//! rewrites is applied on top.
//!
//! The entry point for most callers is
//! [`PipelineExecutor`](precompiler::pipeline::PipelineExecutor).

pub mod precompiler;
