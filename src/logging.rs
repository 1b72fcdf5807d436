//! Logging initialization.
//!
//! Stderr output is on by default; rolling log files are opt-in. `RUST_LOG`
//! overrides the configured level for stderr only.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Flushes pending log writes when dropped; keep it alive until exit.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _stderr_guard: Option<WorkerGuard>,
}

/// Install the global subscriber. Relative log directories resolve against
/// `base_dir`.
pub fn init_logging(config: &LoggingConfig, base_dir: &Path) -> Result<LoggingGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;
    let mut stderr_guard = None;

    if config.file {
        let log_dir = resolve_log_dir(&config.directory, base_dir);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let appender = RollingFileAppender::new(
            parse_rotation(&config.rotation),
            &log_dir,
            &config.file_prefix,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(parse_level(&config.level))
                .boxed(),
        );
    }

    if config.stderr {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_level(&config.level));
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        stderr_guard = Some(guard);

        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_filter(filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

fn resolve_log_dir(directory: &Path, base_dir: &Path) -> PathBuf {
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        base_dir.join(directory)
    }
}

fn parse_level(level: &str) -> EnvFilter {
    let level_lower = level.to_lowercase();
    let directive = match level_lower.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => format!("symdex={}", level_lower),
        _ => {
            eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
            "symdex=info".to_string()
        }
    };
    EnvFilter::new(directive)
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
