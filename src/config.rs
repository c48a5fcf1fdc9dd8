//! Runtime configuration for the droid gateway
//!
//! There is no configuration file: the gateway keeps no persistent state,
//! so everything is supplied on the command line (or via environment
//! variables) and held in a plain struct.

use std::time::Duration;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path or name of the adb binary
    pub adb_path: String,

    /// Bound on a single adb invocation; the spawned process is killed
    /// when it expires.
    pub command_timeout: Duration,

    /// Default duration for swipes and long-presses when the caller
    /// omits one, in milliseconds.
    pub default_duration_ms: u64,

    /// Maximum number of bytes of raw `dumpsys sensorservice` output
    /// returned to the caller.
    pub sensor_dump_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            command_timeout: Duration::from_secs(30),
            default_duration_ms: 300,
            sensor_dump_limit: 500,
        }
    }
}

impl Config {
    /// Timeout in whole seconds, for error messages
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.command_timeout.as_secs()
    }
}
