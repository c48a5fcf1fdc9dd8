//! Command dispatch: validation, device resolution, execution, response
//!
//! `CommandGateway` is the single entry point every transport adapter
//! calls; routing layers stay thin and never duplicate dispatch logic.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::command::DeviceCommand;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::ToolExecutor;
use crate::registry::DeviceRegistry;

/// Uniform response shape returned for every request
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub timestamp: String,
}

impl Envelope {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: now(),
        }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: now(),
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Path of the flashlight brightness control written by torch commands
const TORCH_SYSFS_PATH: &str = "/sys/class/leds/flashlight/brightness";

/// Command dispatch and execution gateway
pub struct CommandGateway {
    executor: Arc<dyn ToolExecutor>,
    registry: Arc<DeviceRegistry>,
    config: Config,
}

impl CommandGateway {
    #[must_use]
    pub fn new(executor: Arc<dyn ToolExecutor>, registry: Arc<DeviceRegistry>, config: Config) -> Self {
        Self {
            executor,
            registry,
            config,
        }
    }

    /// Parse a named command from the wire, then dispatch it.
    ///
    /// # Errors
    ///
    /// Validation errors surface before any process is spawned; see
    /// [`Self::dispatch`] for execution errors.
    pub async fn dispatch_named(
        &self,
        name: &str,
        params: &Value,
        device_hint: Option<&str>,
    ) -> Result<Envelope> {
        let command = DeviceCommand::parse(name, params, self.config.default_duration_ms)?;
        self.dispatch(command, device_hint).await
    }

    /// Dispatch a validated command: resolve the target device, run the
    /// adb invocation under the configured timeout, classify the
    /// outcome, and build the envelope.
    ///
    /// # Errors
    ///
    /// [`Error::NoDevice`] when no target resolves; execution failures
    /// are classified as `ToolUnavailable`, `ToolFailure`, `Timeout`, or
    /// `Unsupported` (torch only).
    pub async fn dispatch(
        &self,
        command: DeviceCommand,
        device_hint: Option<&str>,
    ) -> Result<Envelope> {
        let device = self.registry.resolve(device_hint).await?;

        tracing::info!(device = %device, command = ?command, "dispatching command");

        match &command {
            DeviceCommand::SetTorchState {
                enabled,
                brightness,
            } => {
                self.set_torch(&device, *enabled, *brightness).await?;
                Ok(Self::ok_envelope(&command, &device))
            }
            DeviceCommand::GetSensorData { sensor_type } => {
                let result = self.run_shell(&device, &command.shell_args()).await?;
                Self::ensure_success(&command, &result)?;
                let mut dump = result.stdout;
                dump.truncate(floor_char_boundary(&dump, self.config.sensor_dump_limit));
                Ok(Envelope::ok(
                    command.describe(),
                    Some(serde_json::json!({
                        "sensorType": sensor_type,
                        "raw_output": dump,
                        "device_id": device,
                    })),
                ))
            }
            DeviceCommand::GetSystemSetting { key } => {
                let result = self.run_shell(&device, &command.shell_args()).await?;
                Self::ensure_success(&command, &result)?;
                let value = result.stdout.trim().to_string();
                Ok(Envelope::ok(
                    format!("{key} = {value}"),
                    Some(serde_json::json!({
                        "key": key,
                        "value": value,
                        "device_id": device,
                    })),
                ))
            }
            _ => {
                let result = self.run_shell(&device, &command.shell_args()).await?;
                Self::ensure_success(&command, &result)?;
                Ok(Self::ok_envelope(&command, &device))
            }
        }
    }

    /// Torch control has no clean adb primitive. Strategies are tried in
    /// order until one succeeds: a direct sysfs write through the device
    /// shell, then the same write elevated via `su -c`. Both are
    /// best-effort; exhausting the list means the device does not expose
    /// the control (or needs root), not that transport failed.
    async fn set_torch(&self, device: &str, enabled: bool, brightness: Option<u32>) -> Result<()> {
        let value = if enabled {
            brightness.unwrap_or(1).to_string()
        } else {
            "0".to_string()
        };

        let strategies: Vec<Vec<String>> = vec![
            // The `>` is interpreted by the device-side shell that adb
            // forwards joined arguments to; nothing runs through a host
            // shell.
            ["echo", value.as_str(), ">", TORCH_SYSFS_PATH]
                .iter()
                .map(ToString::to_string)
                .collect(),
            vec![
                "su".to_string(),
                "-c".to_string(),
                format!("echo {value} > {TORCH_SYSFS_PATH}"),
            ],
        ];

        for args in &strategies {
            match self.run_shell(device, args).await {
                Ok(result) if result.success() => return Ok(()),
                Ok(result) => {
                    tracing::debug!(stderr = %result.stderr.trim(), "torch strategy failed, trying next");
                }
                // Transport-level problems are not a capability signal
                Err(e @ (Error::ToolUnavailable(_) | Error::Timeout { .. })) => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "torch strategy errored, trying next");
                }
            }
        }

        Err(Error::Unsupported(
            "Failed to control torch. Device may not support this feature or requires root access."
                .to_string(),
        ))
    }

    async fn run_shell(
        &self,
        device: &str,
        shell_args: &[String],
    ) -> Result<crate::executor::ExecutionResult> {
        let mut args = Vec::with_capacity(shell_args.len() + 1);
        args.push("shell".to_string());
        args.extend_from_slice(shell_args);
        self.executor.run(Some(device), &args).await
    }

    fn ensure_success(
        command: &DeviceCommand,
        result: &crate::executor::ExecutionResult,
    ) -> Result<()> {
        if result.success() {
            Ok(())
        } else {
            Err(Error::ToolFailure {
                message: format!(
                    "Failed to execute {}: {}",
                    command_label(command),
                    nonempty(&result.stderr).unwrap_or("unknown error")
                ),
                stderr: result.stderr.clone(),
            })
        }
    }

    fn ok_envelope(command: &DeviceCommand, device: &str) -> Envelope {
        let mut data = command.echo();
        if let Value::Object(map) = &mut data {
            map.insert("device_id".to_string(), Value::String(device.to_string()));
        }
        Envelope::ok(command.describe(), Some(data))
    }
}

fn command_label(command: &DeviceCommand) -> &'static str {
    match command {
        DeviceCommand::Tap { .. } => "tap",
        DeviceCommand::Swipe { .. } => "swipe",
        DeviceCommand::LongPress { .. } => "longPress",
        DeviceCommand::TypeText { .. } => "type",
        DeviceCommand::SetWifiState { .. } => "setWifiState",
        DeviceCommand::SetBluetoothState { .. } => "setBluetoothState",
        DeviceCommand::SetTorchState { .. } => "setTorchState",
        DeviceCommand::GetSensorData { .. } => "getSensorData",
        DeviceCommand::GetSystemSetting { .. } => "getSystemSetting",
        DeviceCommand::SetSystemSetting { .. } => "setSystemSetting",
    }
}

fn nonempty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Largest index `<= max` that falls on a char boundary, so truncation
/// of the sensor dump never splits a UTF-8 sequence.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
