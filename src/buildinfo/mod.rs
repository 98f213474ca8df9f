//! Build metadata embedded in Go binaries.
//!
//! - [`extract`]: runs `go version -m` to dump the metadata of one or more binaries.
//! - [`parse`]: turns that dump into [`BuildInfo`](crate::models::BuildInfo) records.

pub mod extract;
pub mod parse;

pub use extract::{extract, ExtractError};
pub use parse::{parse, ParseError};
