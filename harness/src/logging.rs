use crate::{config::Config, error::Error, util};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Where console log lines go.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConsoleSink {
    Stdout,
    /// Routed through the test harness so output is captured per test.
    Captured,
}

/// Installs the global subscriber: console plus `<log.dir>/test_YYYYMMDD.log`.
///
/// `RUST_LOG` overrides `log.level`. Returns `Ok(false)` when a subscriber was
/// already installed, which keeps repeated calls from tests harmless.
pub fn init(config: &Config, console: ConsoleSink) -> Result<bool, Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_filter(&config.log_level()).to_string()));

    let log_file = log_file_path(config);
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let file_layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = match console {
        ConsoleSink::Stdout => registry.with(fmt::layer()).try_init(),
        ConsoleSink::Captured => registry.with(fmt::layer().with_test_writer()).try_init(),
    };

    match installed {
        Ok(()) => {
            debug!("Logging to {}", log_file.display());
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

/// Maps a `log.level` name to a filter. `WARNING` and `CRITICAL` are accepted
/// as aliases; anything unrecognised means `INFO`.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        "OFF" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

pub fn log_file_path(config: &Config) -> PathBuf {
    config.log_dir().join(format!(
        "test_{}.log",
        util::current_time_with_format("%Y%m%d")
    ))
}
