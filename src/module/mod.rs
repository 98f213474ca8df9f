//! Module source resolution.
//!
//! [`ModuleResolver`] is the seam between the scan and wherever module
//! sources come from; [`fetch::GoModDownload`] resolves them through the
//! `go` command and its module cache.

pub mod fetch;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::models::{Module, ModuleReference};

pub use fetch::GoModDownload;

/// Resolves module references to modules with a local source directory.
pub trait ModuleResolver {
    /// Fetch every reference in `refs`. An empty slice yields an empty result.
    fn fetch(
        &self,
        refs: &[ModuleReference],
    ) -> impl Future<Output = Result<Vec<Module>, FetchError>> + Send;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {}s downloading {module}", .timeout.as_secs())]
    Timeout { module: String, timeout: Duration },
    #[error("failed to download {module}: {message}")]
    Download { module: String, message: String },
    #[error("`go mod download {module}` failed ({status}): {stderr}")]
    Command {
        module: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("unexpected `go mod download` output for {module}: {source}")]
    Decode {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}
