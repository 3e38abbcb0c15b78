//! Logging initialization for the board client.
//!
//! Thin wrapper over the `observability` package: structured JSONL in
//! `<base>/logs/board.jsonl` plus an optional stderr stream.

use std::path::PathBuf;

use crate::CoreResult;

/// Initializes logging for the `board` service at `level`.
///
/// `RUST_LOG` takes precedence over `level` when set. With no `log_path`
/// the file lands in `~/.board/logs/board.jsonl`.
pub fn init_logging(
    level: &str,
    log_path: Option<PathBuf>,
    also_stderr: bool,
) -> CoreResult<PathBuf> {
    init_logging_for_service("board", level, log_path, also_stderr)
}

/// Initializes logging under a custom service name.
pub fn init_logging_for_service(
    service_name: &str,
    level: &str,
    log_path: Option<PathBuf>,
    also_stderr: bool,
) -> CoreResult<PathBuf> {
    let path = observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: parse_level(level).as_str().to_lowercase(),
        log_path,
        also_stderr,
    })?;
    Ok(path)
}

/// Parses a log level name, falling back to INFO.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
