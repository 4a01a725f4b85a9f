//! Child process execution with timeouts.
//!
//! Every external tool the bundler drives (otool, iconutil, clang, hdiutil)
//! goes through [`run_tool`], so a hung tool ends the run with
//! [`Error::Timeout`] instead of blocking forever.

use crate::bundler::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

/// Locates `tool` on `PATH`.
pub fn find_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            Err(Error::ToolNotFound { tool: tool.to_string() })
        }
    }
}

/// Runs `program` with `args` and returns its captured output.
///
/// The child is killed if it is still running after `timeout`. A non-zero
/// exit status is an [`Error::ExternalTool`] carrying the tool's stderr.
pub async fn run_tool<I, S>(
    program: &Path,
    args: I,
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_unchecked(program, args, cwd, timeout).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::ExternalTool {
            tool: tool_name(program),
            reason: format!("{} {}", output.status, stderr.trim()),
        });
    }
    Ok(output)
}

/// Like [`run_tool`] but leaves the exit status to the caller.
pub async fn run_unchecked<I, S>(
    program: &Path,
    args: I,
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = tokio::process::Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let child = command.spawn().map_err(|e| Error::ExternalTool {
        tool: tool_name(program),
        reason: format!("failed to start: {}", e),
    })?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(Error::ExternalTool {
            tool: tool_name(program),
            reason: e.to_string(),
        }),
        // Dropping the wait future drops the child, which kills it.
        Err(_) => Err(Error::Timeout {
            tool: tool_name(program),
            seconds: timeout.as_secs(),
        }),
    }
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let out = run_tool(Path::new("/bin/sh"), ["-c", "echo hi"], None, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hi\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_external_failure() {
        let err = run_tool(
            Path::new("/bin/sh"),
            ["-c", "echo broken >&2; exit 3"],
            None,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();
        assert!(err.is_external());
        assert!(err.to_string().contains("broken"), "{err}");
    }

    #[tokio::test]
    async fn hung_tool_times_out() {
        let err = run_tool(
            Path::new("/bin/sh"),
            ["-c", "sleep 5"],
            None,
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }), "{err}");
    }

    #[test]
    fn missing_tool_is_reported_by_name() {
        let err = find_tool("definitely-not-a-real-tool-xyz").unwrap_err();
        assert_eq!(err.to_string(), "required tool `definitely-not-a-real-tool-xyz` not found in PATH");
    }
}
