//! # MedChain Telemetry
//!
//! Structured logging bootstrap for processes embedding the ledger.
//!
//! The ledger crate only emits `tracing` events and spans; this crate
//! decides where they go. Call [`init_telemetry`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medchain_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Ledger events are now written to stdout
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDCHAIN_SERVICE_NAME` | `medchain` | Service name on the startup event |
//! | `MEDCHAIN_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `MEDCHAIN_JSON_LOGS` | `false` | JSON lines instead of pretty text |
//! | `MEDCHAIN_CONSOLE_OUTPUT` | `true` | Write events to stdout |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global subscriber described by `config`.
///
/// Returns a guard to hold for the lifetime of the process. A second call
/// in the same process fails with [`TelemetryError::AlreadyInitialized`].
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Dropping it logs shutdown.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the subscriber was installed for
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
