//! Device discovery and default-device resolution
//!
//! The registry is the only component that invokes adb for discovery.
//! The cached list is guarded by a mutex so refreshes are serialized and
//! concurrent requests observe either the pre- or post-refresh snapshot,
//! never a partially updated one.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::executor::ToolExecutor;

/// One attached device, identified by the opaque serial adb reports
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Device {
    pub id: String,
}

/// Registry of devices observed in the last successful discovery scan
pub struct DeviceRegistry {
    executor: Arc<dyn ToolExecutor>,
    cache: Mutex<Vec<Device>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            executor,
            cache: Mutex::new(Vec::new()),
        }
    }

    /// Run a discovery scan and replace the cached snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::ToolUnavailable`] when adb cannot be invoked, or
    /// [`Error::ToolFailure`] when the listing itself fails.
    pub async fn refresh(&self) -> Result<Vec<Device>> {
        let mut cache = self.cache.lock().await;
        let result = self
            .executor
            .run(None, &["devices".to_string()])
            .await?;

        if !result.success() {
            return Err(Error::ToolFailure {
                message: "device listing failed".to_string(),
                stderr: result.stderr,
            });
        }

        let devices = parse_device_list(&result.stdout);
        tracing::info!(count = devices.len(), "discovered devices");
        *cache = devices.clone();
        Ok(devices)
    }

    /// Resolve the device a command targets.
    ///
    /// An explicit id is taken as-is without membership validation: the
    /// caller asserts it is valid, which lets automation target a serial
    /// the registry has not yet observed. Otherwise the first device of
    /// the last scan wins, refreshing implicitly when the cache is empty.
    ///
    /// # Errors
    ///
    /// [`Error::NoDevice`] when nothing is attached, plus anything
    /// [`Self::refresh`] can return.
    pub async fn resolve(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(id) = explicit {
            return Ok(id.to_string());
        }

        {
            let cache = self.cache.lock().await;
            if let Some(first) = cache.first() {
                return Ok(first.id.clone());
            }
        }

        let devices = self.refresh().await?;
        devices.into_iter().next().map_or(Err(Error::NoDevice), |d| Ok(d.id))
    }

    /// Current snapshot without triggering a scan
    pub async fn devices(&self) -> Vec<Device> {
        self.cache.lock().await.clone()
    }
}

/// Parse `adb devices` output.
///
/// The first line is a header. Each subsequent non-blank line is
/// `<serial>\t<state>`; only state `device` counts as usable. Other
/// states (`unauthorized`, `offline`) and malformed lines are skipped.
fn parse_device_list(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.trim_end().split('\t');
            let serial = fields.next()?.trim();
            let state = fields.next()?.trim();
            (!serial.is_empty() && state == "device").then(|| Device {
                id: serial.to_string(),
            })
        })
        .collect()
}
