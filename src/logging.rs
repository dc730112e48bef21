use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "wordmark.log";
const DEFAULT_FILTER: &str = "wordmark=info";

/// Keeps the background log writer alive; drop it to flush.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Installs a daily rolling file subscriber under `log_dir`, filtered by
/// `RUST_LOG` or `wordmark=info`. Returns `None` if the directory cannot be
/// created or a global subscriber is already set.
pub fn init(log_dir: &Path) -> Option<LoggingGuard> {
    std::fs::create_dir_all(log_dir)
        .or_else(|_| -> std::io::Result<()> {
            let fallback = std::env::temp_dir().join("wordmark").join("logs");
            std::fs::create_dir_all(fallback)
        })
        .ok()?;
    let log_dir = if log_dir.is_dir() {
        log_dir.to_path_buf()
    } else {
        std::env::temp_dir().join("wordmark").join("logs")
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
