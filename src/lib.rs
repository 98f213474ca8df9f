//! `golicense-checkr`: check the licenses of the modules linked into Go binaries.
//!
//! # Flow
//! 1. Dump the binaries' embedded build metadata ([`buildinfo::extract`]).
//! 2. Parse it into one [`models::BuildInfo`] per binary ([`buildinfo::parse`]).
//! 3. Fetch the source of every referenced module ([`module`]).
//! 4. Identify the licenses in each module's license files ([`license`]).
//! 5. Decide each module against the allow-list ([`scan`], [`config`]).
//! 6. Render the [`scan::Summary`] ([`report`]).

pub mod buildinfo;
pub mod cli;
pub mod config;
pub mod license;
pub mod models;
pub mod module;
pub mod report;
pub mod scan;
