//! Bounded pdftk invocations

use crate::PdftkError;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Run `binary args...` and return its standard output
///
/// The child is killed if it outlives `limit`.
pub(crate) async fn run<I, S>(binary: &Path, args: I, limit: Duration) -> Result<String, PdftkError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => PdftkError::NotInstalled(binary.to_path_buf()),
        _ => PdftkError::Spawn(e),
    })?;

    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => return Err(PdftkError::Timeout(limit.as_secs())),
    };

    if !output.status.success() {
        return Err(PdftkError::Failed {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let result = run(
            Path::new("formwright-no-such-tool"),
            ["--version"],
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(PdftkError::NotInstalled(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let out = run(Path::new("sh"), ["-c", "echo FieldName: a"], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.trim(), "FieldName: a");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let result = run(Path::new("sh"), ["-c", "echo bad form >&2; exit 3"], Duration::from_secs(5)).await;
        match result {
            Err(PdftkError::Failed { status, stderr }) => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "bad form");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let result = run(Path::new("sh"), ["-c", "sleep 5"], Duration::from_millis(100)).await;
        assert!(matches!(result, Err(PdftkError::Timeout(_))));
    }
}
