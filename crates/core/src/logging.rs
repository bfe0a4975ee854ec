use crate::config::artiscope_home;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory holding rolling log files (`~/.artiscope/logs`).
pub fn log_dir() -> PathBuf {
    artiscope_home().join("logs")
}

/// Daily-rolling appender named after the component (cli.2026-10-19).
fn file_appender(log_dir: &Path, component: &str) -> io::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(component)
        .build(log_dir)
        .map_err(io::Error::other)
}

/// Without a usable log directory only the stderr layer produces output.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let log_dir = log_dir();
    let (non_blocking, guard, file_error) = match file_appender(&log_dir, component) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (non_blocking, guard, None)
        }
        Err(e) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(io::sink());
            (non_blocking, guard, Some(e))
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    if let Some(e) = file_error {
        warn!("File logging disabled, cannot use {}: {}", log_dir.display(), e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_creates_log_dir() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");

        assert!(file_appender(&logs, "cli").is_ok());
        assert!(logs.is_dir());
    }

    #[test]
    fn test_file_appender_reports_unusable_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        assert!(file_appender(&blocker.join("logs"), "cli").is_err());
    }
}
