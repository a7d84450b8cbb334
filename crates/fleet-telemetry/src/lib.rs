//! # Fleet Telemetry
//!
//! Structured logging for the fleet map workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fleet_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config)?;
//!
//!     // Application code; `tracing` events are now emitted.
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `fleet-map` | Service name in logs |
//! | `FM_LOG_LEVEL` | `info` | Log level filter |
//! | `FM_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `FM_JSON_LOGS` | `false` | JSON formatted output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, StructuredLogger};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for a process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let logger = init_logging(&config)?;
    Ok(TelemetryGuard { logger })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    logger: StructuredLogger,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        self.logger.service_name()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.logger.service_name(), "Shutting down telemetry...");
    }
}
