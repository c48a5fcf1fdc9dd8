//! Device command variants, validation, and adb argument construction
//!
//! A [`DeviceCommand`] is the validated form of one operation against the
//! device. Parsing from the wire (`parse`) is total and side-effect-free:
//! every required field is checked for presence and type before anything
//! is spawned. `shell_args` then yields the exact `adb shell` argument
//! vector; arguments are always passed as a vector, never interpolated
//! into a host shell string.

use serde_json::Value;

use crate::error::{Error, Result};

/// Command names accepted by the generic dispatch endpoint
pub const COMMAND_NAMES: &[&str] = &[
    "tap",
    "swipe",
    "longPress",
    "type",
    "setWifiState",
    "setBluetoothState",
    "setTorchState",
    "getSensorData",
    "getSystemSetting",
    "setSystemSetting",
];

/// One validated operation against the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    Tap {
        x: i64,
        y: i64,
    },
    Swipe {
        start_x: i64,
        start_y: i64,
        end_x: i64,
        end_y: i64,
        duration_ms: u64,
    },
    LongPress {
        x: i64,
        y: i64,
        duration_ms: u64,
    },
    TypeText {
        text: String,
    },
    SetWifiState {
        enabled: bool,
    },
    SetBluetoothState {
        enabled: bool,
    },
    SetTorchState {
        enabled: bool,
        brightness: Option<u32>,
    },
    GetSensorData {
        sensor_type: String,
    },
    GetSystemSetting {
        key: String,
    },
    SetSystemSetting {
        key: String,
        value: String,
    },
}

impl DeviceCommand {
    /// Parse a named command and its parameter map from the wire.
    ///
    /// Parameter keys use the original wire contract (camelCase:
    /// `startX`, `durationMs`, `sensorType`, ...). `durationMs` may be
    /// omitted for swipes and long-presses, in which case
    /// `default_duration_ms` applies.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCommand`] for an unrecognized name,
    /// [`Error::InvalidParameters`] for missing or mistyped fields.
    pub fn parse(name: &str, params: &Value, default_duration_ms: u64) -> Result<Self> {
        match name {
            "tap" => Ok(Self::Tap {
                x: require_int(params, "x")?,
                y: require_int(params, "y")?,
            }),
            "swipe" => Ok(Self::Swipe {
                start_x: require_int(params, "startX")?,
                start_y: require_int(params, "startY")?,
                end_x: require_int(params, "endX")?,
                end_y: require_int(params, "endY")?,
                duration_ms: optional_duration(params, "durationMs", default_duration_ms)?,
            }),
            "longPress" => Ok(Self::LongPress {
                x: require_int(params, "x")?,
                y: require_int(params, "y")?,
                duration_ms: optional_duration(params, "durationMs", default_duration_ms)?,
            }),
            "type" => Ok(Self::TypeText {
                text: require_string(params, "text")?,
            }),
            "setWifiState" => Ok(Self::SetWifiState {
                enabled: require_bool(params, "state")?,
            }),
            "setBluetoothState" => Ok(Self::SetBluetoothState {
                enabled: require_bool(params, "state")?,
            }),
            "setTorchState" => Ok(Self::SetTorchState {
                enabled: require_bool(params, "state")?,
                brightness: optional_brightness(params)?,
            }),
            "getSensorData" => Ok(Self::GetSensorData {
                sensor_type: require_string(params, "sensorType")?,
            }),
            "getSystemSetting" => Ok(Self::GetSystemSetting {
                key: require_string(params, "key")?,
            }),
            "setSystemSetting" => Ok(Self::SetSystemSetting {
                key: require_string(params, "key")?,
                value: require_stringish(params, "value")?,
            }),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }

    /// The `adb shell` argument vector for this command.
    ///
    /// `SetTorchState` has no single vector; its invocation strategies
    /// live in the gateway. Long-press is simulated as a zero-distance
    /// swipe: adb's `input` has no native long-press primitive, and a
    /// swipe that stays in place for the duration produces the
    /// press-and-hold effect.
    #[must_use]
    pub fn shell_args(&self) -> Vec<String> {
        match self {
            Self::Tap { x, y } => to_args(&["input", "tap", &x.to_string(), &y.to_string()]),
            Self::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => to_args(&[
                "input",
                "swipe",
                &start_x.to_string(),
                &start_y.to_string(),
                &end_x.to_string(),
                &end_y.to_string(),
                &duration_ms.to_string(),
            ]),
            Self::LongPress { x, y, duration_ms } => to_args(&[
                "input",
                "swipe",
                &x.to_string(),
                &y.to_string(),
                &x.to_string(),
                &y.to_string(),
                &duration_ms.to_string(),
            ]),
            Self::TypeText { text } => to_args(&["input", "text", &escape_text(text)]),
            Self::SetWifiState { enabled } => {
                to_args(&["svc", "wifi", if *enabled { "enable" } else { "disable" }])
            }
            Self::SetBluetoothState { enabled } => to_args(&[
                "svc",
                "bluetooth",
                if *enabled { "enable" } else { "disable" },
            ]),
            Self::SetTorchState { .. } => Vec::new(),
            Self::GetSensorData { .. } => to_args(&["dumpsys", "sensorservice"]),
            Self::GetSystemSetting { key } => to_args(&["settings", "get", "system", key]),
            Self::SetSystemSetting { key, value } => {
                to_args(&["settings", "put", "system", key, value])
            }
        }
    }

    /// Human-readable confirmation for success envelopes
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Tap { x, y } => format!("Tapped at ({x}, {y})"),
            Self::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => format!("Swiped from ({start_x}, {start_y}) to ({end_x}, {end_y}) in {duration_ms}ms"),
            Self::LongPress { x, y, duration_ms } => {
                format!("Long pressed at ({x}, {y}) for {duration_ms}ms")
            }
            Self::TypeText { text } => format!("Typed text: {text}"),
            Self::SetWifiState { enabled } => {
                format!("WiFi {}", if *enabled { "enabled" } else { "disabled" })
            }
            Self::SetBluetoothState { enabled } => {
                format!("Bluetooth {}", if *enabled { "enabled" } else { "disabled" })
            }
            Self::SetTorchState { enabled, .. } => {
                format!("Torch {}", if *enabled { "enabled" } else { "disabled" })
            }
            Self::GetSensorData { sensor_type } => {
                format!("Retrieved sensor data for {sensor_type}")
            }
            Self::GetSystemSetting { key } => format!("Read system setting {key}"),
            Self::SetSystemSetting { key, value } => format!("Set {key} = {value}"),
        }
    }

    /// Structured echo of the applied parameters, for the `data` field
    #[must_use]
    pub fn echo(&self) -> Value {
        match self {
            Self::Tap { x, y } => serde_json::json!({ "x": x, "y": y }),
            Self::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => serde_json::json!({
                "start_x": start_x,
                "start_y": start_y,
                "end_x": end_x,
                "end_y": end_y,
                "duration": duration_ms,
            }),
            Self::LongPress { x, y, duration_ms } => {
                serde_json::json!({ "x": x, "y": y, "duration": duration_ms })
            }
            Self::TypeText { text } => serde_json::json!({ "text": text }),
            Self::SetWifiState { enabled }
            | Self::SetBluetoothState { enabled } => serde_json::json!({ "enabled": enabled }),
            Self::SetTorchState {
                enabled,
                brightness,
            } => serde_json::json!({ "enabled": enabled, "brightness": brightness }),
            Self::GetSensorData { sensor_type } => {
                serde_json::json!({ "sensorType": sensor_type })
            }
            Self::GetSystemSetting { key } => serde_json::json!({ "key": key }),
            Self::SetSystemSetting { key, value } => {
                serde_json::json!({ "key": key, "value": value })
            }
        }
    }
}

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

/// Escape text for `input text`.
///
/// adb's text input does not accept literal spaces (they terminate the
/// argument on the device side) and the device shell interprets
/// metacharacters in the forwarded string. Spaces become `%s`; shell
/// metacharacters are backslash-escaped. The result is still passed as a
/// single argv element, so nothing is interpreted on the host.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' ' => out.push_str("%s"),
            '&' | '<' | '>' | '|' | ';' | '(' | ')' | '\'' | '"' | '`' | '$' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn require_int(params: &Value, key: &str) -> Result<i64> {
    match params.get(key) {
        Some(v) => v.as_i64().ok_or_else(|| {
            Error::InvalidParameters(format!("parameter '{key}' must be an integer"))
        }),
        None => Err(missing(key)),
    }
}

fn optional_duration(params: &Value, key: &str, default: u64) -> Result<u64> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_u64().ok_or_else(|| {
            Error::InvalidParameters(format!("parameter '{key}' must be a non-negative integer"))
        }),
    }
}

fn optional_brightness(params: &Value) -> Result<Option<u32>> {
    match params.get("brightness") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                Error::InvalidParameters(
                    "parameter 'brightness' must be a non-negative integer".to_string(),
                )
            }),
    }
}

fn require_string(params: &Value, key: &str) -> Result<String> {
    match params.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(Error::InvalidParameters(format!(
            "parameter '{key}' must not be empty"
        ))),
        Some(_) => Err(Error::InvalidParameters(format!(
            "parameter '{key}' must be a string"
        ))),
        None => Err(missing(key)),
    }
}

/// Accept string, number, or bool and stringify; settings values arrive
/// in all three shapes from callers.
fn require_stringish(params: &Value, key: &str) -> Result<String> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(Error::InvalidParameters(format!(
            "parameter '{key}' must be a string, number, or boolean"
        ))),
        None => Err(missing(key)),
    }
}

fn require_bool(params: &Value, key: &str) -> Result<bool> {
    match params.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(Error::InvalidParameters(format!(
            "parameter '{key}' must be a boolean"
        ))),
        None => Err(missing(key)),
    }
}

fn missing(key: &str) -> Error {
    Error::InvalidParameters(format!("parameter '{key}' is required"))
}
