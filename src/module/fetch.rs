use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use indicatif::ProgressBar;
use serde::Deserialize;
use tokio::process::Command;

use super::{FetchError, ModuleResolver};
use crate::models::{Module, ModuleReference};

pub const DEFAULT_JOBS: usize = 8;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One object of the `go mod download -json` output stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Download {
    path: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    error: Option<String>,
}

/// Resolves modules with `go mod download -json`, which fills (or reuses) the
/// local module cache and reports where each module's source lives.
#[derive(Debug, Clone)]
pub struct GoModDownload {
    go: String,
    jobs: usize,
    timeout: Duration,
    progress: Option<ProgressBar>,
}

impl GoModDownload {
    pub fn new(go: impl Into<String>) -> Self {
        Self {
            go: go.into(),
            jobs: DEFAULT_JOBS,
            timeout: DEFAULT_TIMEOUT,
            progress: None,
        }
    }

    /// Maximum number of concurrent `go` processes.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Time limit for a single module download.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Progress bar advanced once per resolved module.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn download(&self, workdir: &Path, reference: &ModuleReference) -> Result<Module, FetchError> {
        // Filesystem replacements are not in any module cache.
        if is_local_path(&reference.path) {
            tracing::warn!("skipping download of local module {}", reference);
            return Ok(Module::new(reference.clone()));
        }

        let target = reference.to_string();
        tracing::debug!("{} mod download -json {}", self.go, target);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.go)
                .args(["mod", "download", "-json", target.as_str()])
                .current_dir(workdir)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| FetchError::Timeout {
            module: target.clone(),
            timeout: self.timeout,
        })?
        .map_err(|source| FetchError::Spawn {
            program: self.go.clone(),
            source,
        })?;

        let downloads = match decode_downloads(&output.stdout) {
            Ok(downloads) => downloads,
            // `go` prints nothing decodable when it fails before downloading.
            Err(_) if !output.status.success() => {
                return Err(FetchError::Command {
                    module: target,
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
            Err(source) => return Err(FetchError::Decode { module: target, source }),
        };

        let download = downloads
            .into_iter()
            .find(|d| d.path == reference.path)
            .ok_or_else(|| FetchError::Command {
                module: target.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })?;

        if let Some(message) = download.error.filter(|e| !e.is_empty()) {
            return Err(FetchError::Download {
                module: target,
                message,
            });
        }

        let dir = download.dir.ok_or_else(|| FetchError::Download {
            module: target.clone(),
            message: "no module directory reported".to_string(),
        })?;

        tracing::debug!("{} resolved to {}", target, dir.display());

        // Keep the requested identity so findings stay keyed by what the binary references.
        let mut module = Module::new(reference.clone());
        module.dir = Some(dir);
        Ok(module)
    }
}

impl Default for GoModDownload {
    fn default() -> Self {
        Self::new("go")
    }
}

impl ModuleResolver for GoModDownload {
    async fn fetch(&self, refs: &[ModuleReference]) -> Result<Vec<Module>, FetchError> {
        let unique: Vec<&ModuleReference> = refs.iter().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        // Run outside any enclosing module so its go.mod cannot interfere.
        let scratch = tempfile::tempdir().map_err(FetchError::Scratch)?;

        let mut modules = Vec::with_capacity(unique.len());
        for batch in unique.chunks(self.jobs) {
            let results = join_all(
                batch
                    .iter()
                    .map(|reference| self.download(scratch.path(), reference)),
            )
            .await;

            for result in results {
                modules.push(result?);
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
            }
        }

        Ok(modules)
    }
}

fn decode_downloads(stdout: &[u8]) -> Result<Vec<Download>, serde_json::Error> {
    serde_json::Deserializer::from_slice(stdout)
        .into_iter::<Download>()
        .collect()
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('.') || path.starts_with('/') || Path::new(path).is_absolute()
}
