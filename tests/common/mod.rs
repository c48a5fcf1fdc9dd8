//! Shared test utilities

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use droid_gateway::api::ApiState;
use droid_gateway::{Config, Error, ExecutionResult, Result, ToolExecutor};

/// Scripted executor: fixed discovery output, fixed shell result,
/// recorded invocations. No process is ever spawned.
pub struct ScriptedExecutor {
    device_list: String,
    shell_result: ExecutionResult,
    available: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    #[must_use]
    pub fn new(device_list: &str, shell_result: ExecutionResult) -> Self {
        Self {
            device_list: device_list.to_string(),
            shell_result,
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// One device (`abc123`) attached, every shell command succeeds silently
    #[must_use]
    pub fn single_device() -> Self {
        Self::new("List of devices attached\nabc123\tdevice\n", ok_result(""))
    }

    /// Discovery finds nothing
    #[must_use]
    pub fn no_devices() -> Self {
        Self::new("List of devices attached\n", ok_result(""))
    }

    /// adb is not installed at all
    #[must_use]
    pub fn unavailable() -> Self {
        let mut exec = Self::single_device();
        exec.available = false;
        exec
    }

    /// All recorded argument vectors, in call order
    #[must_use]
    pub fn recorded(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutor for ScriptedExecutor {
    async fn run(&self, _device: Option<&str>, args: &[String]) -> Result<ExecutionResult> {
        if !self.available {
            return Err(Error::ToolUnavailable("adb not found".to_string()));
        }
        self.calls.lock().unwrap().push(args.to_vec());
        if args == ["version"] {
            return Ok(ok_result("Android Debug Bridge version 1.0.41"));
        }
        if args == ["devices"] {
            return Ok(ok_result(&self.device_list));
        }
        Ok(self.shell_result.clone())
    }
}

/// Successful execution with the given stdout
#[must_use]
pub fn ok_result(stdout: &str) -> ExecutionResult {
    ExecutionResult {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Build API state around a scripted executor
#[must_use]
pub fn test_state(executor: Arc<ScriptedExecutor>) -> Arc<ApiState> {
    ApiState::new(executor, Config::default())
}
