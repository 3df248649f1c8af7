// file: src/shell/local.rs
// version: 1.0.1
// guid: c4d7e9a0-2b15-4f6c-8e3a-9d0b1c2f5e78

//! Local command execution through a command interpreter

use super::{CommandRunner, ShellError, ShellResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

/// Exit status a POSIX shell reports when it cannot find the command
const SHELL_NOT_FOUND_STATUS: i32 = 127;

/// Enables `pipefail` where the interpreter supports it; plain `sh -o pipefail`
/// aborts on dash, so the option is tested in a subshell first
const PIPEFAIL_PREAMBLE: &str = "(set -o pipefail) 2>/dev/null && set -o pipefail; ";

/// Default per-invocation timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs commands locally via `<shell> -c <command>`
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    timeout: Duration,
}

impl ShellRunner {
    /// Create a new runner using bash and the default timeout
    pub fn new() -> Self {
        Self {
            shell: "bash".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different command interpreter
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Use a different per-invocation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if a tool exists in PATH
    pub fn tool_available(tool: &str) -> bool {
        which::which(tool).is_ok()
    }

    async fn execute(&self, command: &str) -> ShellResult {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(format!("{}{}", PIPEFAIL_PREAMBLE, command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShellError::command_not_found(
                    command,
                    format!("shell '{}' not found: {}", self.shell, e),
                )
            } else {
                ShellError::command_failed(command, None, format!("Failed to execute command: {}", e))
            }
        })?;
        let pgid = child.id();

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                ShellError::command_failed(command, None, format!("Failed to collect output: {}", e))
            })?,
            Err(_) => {
                // The shell is its own group leader; take its pipeline stages down with it.
                if let Some(pgid) = pgid {
                    kill_process_group(pgid);
                }
                return Err(ShellError::timed_out(command, self.timeout.as_secs_f64()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            return Ok(stdout.trim().to_string());
        }

        let exit_code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if exit_code == Some(SHELL_NOT_FOUND_STATUS) {
            return Err(ShellError::command_not_found(command, stderr));
        }

        Err(ShellError::command_failed(
            command,
            exit_code,
            if stderr.is_empty() {
                stdout.trim().to_string()
            } else {
                stderr
            },
        ))
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; an already-reaped group yields ESRCH.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(
            "Process group {} already gone: {}",
            pgid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> ShellResult {
        debug!("Executing shell command: {}", command);

        let result = self.execute(command).await;
        match &result {
            Ok(stdout) => debug!("Command '{}' returned {} bytes", command, stdout.len()),
            Err(e) => error!(
                command = %command,
                kind = %e.kind,
                exit_code = ?e.exit_code,
                "Shell command '{}' failed: {}",
                command,
                e.message
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellErrorKind;

    #[tokio::test]
    async fn test_successful_command_is_trimmed() {
        let runner = ShellRunner::new().with_shell("sh");

        let result = runner.run("printf '  hello world \\n\\n'").await;

        assert_eq!(result.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_pipes_are_supported() {
        let runner = ShellRunner::new().with_shell("sh");

        let result = runner.run("printf 'Revision\\t: a02082\\n' | cut -d: -f2").await;

        assert_eq!(result.unwrap(), "a02082");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_command_failed_with_stderr() {
        let runner = ShellRunner::new().with_shell("sh");

        let err = runner.run("echo 'disk on fire' >&2; exit 3").await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandFailed);
        assert_eq!(err.exit_code, Some(3));
        assert_eq!(err.message, "disk on fire");
        assert_eq!(err.command, "echo 'disk on fire' >&2; exit 3");
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found() {
        let runner = ShellRunner::new().with_shell("sh");

        let err = runner.run("nonexistent-command-12345 --flag").await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandNotFound);
    }

    #[tokio::test]
    async fn test_missing_shell_is_not_found() {
        let runner = ShellRunner::new().with_shell("/nonexistent/shell-12345");

        let err = runner.run("true").await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandNotFound);
    }

    #[tokio::test]
    async fn test_slow_command_times_out() {
        let runner = ShellRunner::new()
            .with_shell("sh")
            .with_timeout(Duration::from_millis(100));

        let err = runner.run("sleep 5").await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::TimedOut);
        assert_eq!(err.exit_code, None);
    }

    #[tokio::test]
    async fn test_missing_first_pipeline_stage_is_not_found() {
        let runner = ShellRunner::new();

        let err = runner
            .run("nonexistent-command-12345 -h | tail -n +2 | sort -k6")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandNotFound);
        assert_eq!(err.command, "nonexistent-command-12345 -h | tail -n +2 | sort -k6");
    }

    #[tokio::test]
    async fn test_failing_first_pipeline_stage_is_command_failed() {
        let runner = ShellRunner::new();

        let err = runner.run("sh -c 'exit 3' | cat").await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandFailed);
        assert_eq!(err.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_missing_df_is_not_an_empty_disk_list() {
        let runner = ShellRunner::new();
        let command = crate::parsers::disk::DF_COMMAND.replace("df -h", "df-missing-12345 -h");

        let err = runner.run(&command).await.unwrap_err();

        assert_eq!(err.kind, ShellErrorKind::CommandNotFound);
    }

    #[tokio::test]
    async fn test_shell_without_pipefail_still_runs_pipelines() {
        let runner = ShellRunner::new().with_shell("sh");

        let result = runner.run("printf 'a\\nb\\n' | sort -r | head -n 1").await;

        assert_eq!(result.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_timeout_kills_every_pipeline_stage() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late-stage-ran");
        let runner = ShellRunner::new()
            .with_shell("sh")
            .with_timeout(Duration::from_millis(100));

        let err = runner
            .run(&format!("sleep 5 | {{ sleep 1; touch '{}'; }}", marker.display()))
            .await
            .unwrap_err();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(err.kind, ShellErrorKind::TimedOut);
        assert!(!marker.exists());
    }

    #[test]
    fn test_tool_available() {
        assert!(ShellRunner::tool_available("sh"));
        assert!(!ShellRunner::tool_available("nonexistent-command-12345"));
    }
}
