//! Droid Gateway - HTTP control surface for Android devices via adb
//!
//! Translates structured commands (tap, swipe, type text, hardware
//! toggles, system settings, sensor queries) into adb invocations and
//! returns a uniform success/error envelope, so automation and agent
//! processes can drive a single attached device without shelling out to
//! adb themselves.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          HTTP routes (axum adapters)         │
//! │  /tap  /swipe  /type  /mcp/command  /health │
//! └──────────────────────┬──────────────────────┘
//!                        │
//! ┌──────────────────────▼──────────────────────┐
//! │              CommandGateway                  │
//! │  validate → resolve device → execute → classify
//! └──────────┬──────────────────────┬───────────┘
//!            │                      │
//! ┌──────────▼─────────┐ ┌──────────▼───────────┐
//! │   DeviceRegistry   │ │     ToolExecutor      │
//! │  discovery cache   │ │  adb, argv + timeout  │
//! └────────────────────┘ └──────────────────────┘
//! ```

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod registry;

pub use command::DeviceCommand;
pub use config::Config;
pub use error::{Error, Result};
pub use executor::{AdbExecutor, ExecutionResult, ToolExecutor};
pub use gateway::{CommandGateway, Envelope};
pub use registry::{Device, DeviceRegistry};
