//! Logging setup.
//!
//! The terminal belongs to the page, so logs go to a file through a
//! non-blocking `tracing-appender` writer. `RUST_LOG` overrides the default
//! filter.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{FolioError, Result};

pub const LOG_FILE_PREFIX: &str = "spark-folio";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const DEFAULT_FILTER: &str = "spark_folio=info";

/// Where logs go when no directory is given.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Full path of the log file inside `dir`.
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join(format!("{LOG_FILE_PREFIX}.{LOG_FILE_SUFFIX}"))
}

/// Install the global subscriber writing into `dir`.
///
/// Keep the returned guard alive for the whole run; dropping it flushes.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| FolioError::Logging(format!("{}: {e}", dir.display())))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| FolioError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file(Path::new("/tmp/x")), PathBuf::from("/tmp/x/spark-folio.log"));
    }

    #[test]
    fn test_init_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init(dir.path()).unwrap();
        tracing::info!("logging initialized for test");
        drop(guard);

        let content = std::fs::read_to_string(log_file(dir.path())).unwrap();
        assert!(content.contains("logging initialized for test"));
    }
}
