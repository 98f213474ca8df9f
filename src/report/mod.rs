//! Report renderers for scan summaries.
//!
//! - [`terminal`]: colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - [`json`]: the [`Summary`](crate::scan::Summary) as pretty-printed JSON.

pub mod json;
pub mod terminal;
