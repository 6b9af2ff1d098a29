//! Header merge resolver
//!
//! Produces one self-contained translation unit from a root file by inlining
//! every include that resolves against the search paths. The compiler front
//! end is never involved: directives are recognised line by line, and
//! anything that does not resolve is left for the real compiler.
//!
//! Per line of each file:
//! - `#pragma once` becomes a marker comment; the visited set does the
//!   de-duplication instead.
//! - A resolvable, not yet visited include is replaced by the header's own
//!   merged content, an end-of-file marker and a `#line` directive restoring
//!   the parent's numbering.
//! - A resolvable include that was already visited becomes a blank line.
//! - An unresolvable include stays verbatim.
//! - Everything else is copied unchanged.
//!
//! Each original line maps to exactly one output line, so the `#line`
//! directives keep diagnostics pointing at the original files.

pub mod include;
pub mod merger;
pub mod search;
pub mod session;

pub use include::{IncludeDirective, IncludeForm};
pub use merger::{merge, HeaderMerger, MergeOutput};
pub use search::{ResolvedInclude, SearchPaths};
pub use session::{IncludeSite, MergeReport, MergeSession};
