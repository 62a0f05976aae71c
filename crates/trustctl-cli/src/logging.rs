//! Log file setup.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "trustctl=info";

const LOG_FILE_PREFIX: &str = "trustctl";
const MAX_LOG_FILES: usize = 3;

/// Install the global subscriber.
///
/// Logs go to a daily-rotated file under `dir`, or the home directory if
/// `dir` can't be used. `verbose` mirrors them to stderr. Keep the returned
/// guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path, verbose: bool) -> Result<(WorkerGuard, PathBuf)> {
    let (appender, dir) = match file_appender(dir) {
        Ok(appender) => (appender, dir.to_path_buf()),
        Err(e) => {
            let fallback = fallback_dir();
            eprintln!(
                "{} Cannot write logs to {} ({e}), using {} instead.",
                "Warning:".yellow().bold(),
                dir.display(),
                fallback.display()
            );
            (file_appender(&fallback)?, fallback)
        }
    };
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let stderr_layer = verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(stderr_layer)
        .try_init()?;

    Ok((guard, dir))
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?)
}

fn fallback_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.home_dir().to_path_buf())
}
