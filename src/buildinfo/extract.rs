use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program} version -m` failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Run `go version -m` over `binaries` and return the raw metadata dump.
///
/// All binaries go through one invocation, so the output is the concatenation
/// of one block per binary.
pub async fn extract(go: &str, binaries: &[PathBuf]) -> Result<String, ExtractError> {
    if binaries.is_empty() {
        return Ok(String::new());
    }

    tracing::debug!("running {} version -m on {} binaries", go, binaries.len());

    let output = Command::new(go)
        .arg("version")
        .arg("-m")
        .args(binaries)
        .output()
        .await
        .map_err(|source| ExtractError::Spawn {
            program: go.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExtractError::Failed {
            program: go.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use super::*;

    fn fake_go(dir: &Path, script: &str) -> String {
        let path = dir.join("go");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_extract_passes_binaries() {
        let dir = tempfile::tempdir().unwrap();
        let go = fake_go(dir.path(), r#"echo "$3: go1.21.0""#);

        let raw = extract(&go, &[PathBuf::from("/tmp/app")]).await.unwrap();
        assert_eq!(raw, "/tmp/app: go1.21.0\n");
    }

    #[tokio::test]
    async fn test_extract_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let go = fake_go(dir.path(), "echo 'not a Go executable' >&2; exit 1");

        let err = extract(&go, &[PathBuf::from("/tmp/app")]).await.unwrap_err();
        assert!(matches!(err, ExtractError::Failed { .. }));
        assert!(err.to_string().contains("not a Go executable"));
    }

    #[tokio::test]
    async fn test_extract_no_binaries() {
        assert_eq!(extract("does-not-exist", &[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_extract_missing_program() {
        let err = extract("/nonexistent/go", &[PathBuf::from("/tmp/app")])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Spawn { .. }));
    }
}
