// 📝 Logging - tracing subscriber setup
//
// The terminal UI owns stdout, so in UI mode logs go to a daily rolling file
// under `<data_dir>/logs`. Every other mode logs to stderr.

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_FILE_NAME: &str = "salary-calculator.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered file logs get flushed.
pub fn init(config: &Config, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
            Ok(None)
        }
        LogTarget::File => {
            let log_dir = config.log_dir();
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

            let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
            Ok(Some(guard))
        }
    }
}
