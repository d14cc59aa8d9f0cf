//! Logging service

use crate::models::LogLevel;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "gobuild=error,gobuild_core=error",
        LogLevel::Warn => "gobuild=warn,gobuild_core=warn",
        LogLevel::Info => "gobuild=info,gobuild_core=info",
        LogLevel::Debug => "gobuild=debug,gobuild_core=debug",
        LogLevel::Trace => "gobuild=trace,gobuild_core=trace",
    }
}

/// Initialize logging with the specified level.
///
/// `RUST_LOG` overrides the configured level when set. Output goes to
/// stderr so stdout stays reserved for tool output.
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

/// Log the start of a palette command
pub fn log_command(command: &str, file: Option<&Path>) {
    tracing::info!(
        command = command,
        file = %file.map(|f| f.display().to_string()).unwrap_or_default(),
        "Command started"
    );
}

/// Log a command that ended with an error shown to the user
pub fn log_command_error(command: &str, error: &str) {
    tracing::warn!(command = command, error = error, "Command failed");
}
