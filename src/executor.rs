//! adb process execution with timeout and failure classification
//!
//! [`ToolExecutor`] is the seam between the gateway and the outside
//! world; everything above it can be tested against a fake. The real
//! implementation spawns adb with an argument vector (never through a
//! shell) and enforces the configured timeout by killing the child.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{Error, Result};

/// Outcome of one completed adb invocation.
///
/// Timeouts and a missing binary never produce one of these; they are
/// reported as [`Error::Timeout`] and [`Error::ToolUnavailable`].
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Execution boundary for the external device tool
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run the tool with the given arguments, targeting `device` when
    /// one is supplied (`-s <id>` is prepended).
    async fn run(&self, device: Option<&str>, args: &[String]) -> Result<ExecutionResult>;

    /// Cheap availability probe (`adb version`).
    async fn probe(&self) -> bool {
        self.run(None, &["version".to_string()])
            .await
            .is_ok_and(|r| r.success())
    }
}

/// Real adb executor
pub struct AdbExecutor {
    adb_path: String,
    command_timeout: Duration,
}

impl AdbExecutor {
    #[must_use]
    pub const fn new(adb_path: String, command_timeout: Duration) -> Self {
        Self {
            adb_path,
            command_timeout,
        }
    }
}

#[async_trait]
impl ToolExecutor for AdbExecutor {
    async fn run(&self, device: Option<&str>, args: &[String]) -> Result<ExecutionResult> {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(id) = device {
            cmd.arg("-s").arg(id);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(tool = %self.adb_path, device = ?device, ?args, "spawning adb");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolUnavailable(format!("{} not found", self.adb_path))
            } else {
                Error::ToolUnavailable(format!("failed to spawn {}: {e}", self.adb_path))
            }
        })?;

        let output = match timeout(self.command_timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                // Terminate the hung process, don't just abandon the wait.
                // wait_with_output consumed the child, but kill_on_drop
                // has already reaped it at this point; report the bound.
                let seconds = self.command_timeout.as_secs();
                tracing::warn!(tool = %self.adb_path, seconds, "adb command timed out, killed");
                return Err(Error::Timeout { seconds });
            }
        };

        let result = ExecutionResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!(
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "adb exited non-zero"
            );
        }

        Ok(result)
    }
}
