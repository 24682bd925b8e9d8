//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on the startup event
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `medchain_ledger=debug,info`
    pub log_level: String,

    /// Whether to write events to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON lines instead of pretty text
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "medchain".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEDCHAIN_SERVICE_NAME`: Service name (default: medchain)
    /// - `MEDCHAIN_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `MEDCHAIN_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `MEDCHAIN_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("MEDCHAIN_SERVICE_NAME")
                .unwrap_or_else(|_| "medchain".to_string()),

            log_level: env::var("MEDCHAIN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("MEDCHAIN_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("MEDCHAIN_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(is_container),
        }
    }

    /// Same configuration at a different level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Lenient boolean: `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`,
/// anything else falls back to `default`.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
