//! Error types for the droid gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while dispatching device commands
#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter is missing or has the wrong type
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The command name is not part of the supported set
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// No device could be resolved for the request
    #[error("no Android devices connected")]
    NoDevice,

    /// adb is not installed or could not be spawned
    #[error("adb unavailable: {0}")]
    ToolUnavailable(String),

    /// adb ran but exited non-zero
    #[error("{message}")]
    ToolFailure {
        message: String,
        /// Captured standard error, for diagnostics
        stderr: String,
    },

    /// adb exceeded the execution bound and was terminated
    #[error("adb command timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The device does not support the requested capability
    #[error("{0}")]
    Unsupported(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was caused by the caller (bad input, no device)
    /// rather than by the gateway or the tool.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameters(_) | Self::UnknownCommand(_) | Self::NoDevice
        )
    }
}
