//! File logging
//!
//! The terminal belongs to the UI, so log records go to a file in the config
//! directory. Level comes from `RUST_LOG`, defaulting to `info`.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

pub const LOG_FILE_NAME: &str = "customers-tui.log";
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber writing to `<log_dir>/customers-tui.log`
///
/// Records are written by a background worker. Buffered records are flushed
/// when the returned guard is dropped, so keep it alive until shutdown.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    registry().with(env_filter).with(file_layer).try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    /// Set in the child process spawned by `test_records_flushed_before_exit`
    const CHILD_LOG_DIR_ENV: &str = "CUSTOMERS_TUI_TEST_CHILD_LOG_DIR";

    #[test]
    fn test_init_creates_log_file_once() {
        if std::env::var_os(CHILD_LOG_DIR_ENV).is_some() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        let _guard = init(&log_dir).unwrap();
        assert!(log_dir.join(LOG_FILE_NAME).exists());

        assert!(init(&log_dir).is_err());
    }

    #[test]
    fn test_records_flushed_before_exit() {
        if let Some(dir) = std::env::var_os(CHILD_LOG_DIR_ENV) {
            let guard = init(Path::new(&dir)).unwrap();
            for i in 0..200 {
                tracing::info!(i, "filler record");
            }
            tracing::error!("customers-tui crashed");
            drop(guard);
            std::process::exit(1);
        }

        let dir = TempDir::new().unwrap();
        let status = Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "logging::tests::test_records_flushed_before_exit",
                "--test-threads=1",
            ])
            .env(CHILD_LOG_DIR_ENV, dir.path())
            .env_remove("RUST_LOG")
            .status()
            .unwrap();
        assert_eq!(status.code(), Some(1));

        let contents = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(contents.matches("filler record").count(), 200);
        assert!(contents.contains("customers-tui crashed"));
    }
}
