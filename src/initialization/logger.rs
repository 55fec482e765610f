//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting,
//! optionally teeing every line into a log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};
use regex::Regex;

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").ok());

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter will override it.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if logger initialization fails.
///
/// # Examples
///
/// ```bash
/// # Override with CLI args (takes precedence)
/// RUST_LOG=debug link_checker --log-level info check
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=link_checker=debug,reqwest=info link_checker check
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = build_logger(level, format);
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

/// Initializes the logger and appends every line to `path` as well as stderr.
///
/// Parent directories are created. Colour codes are stripped from the file copy.
///
/// # Errors
///
/// Returns `InitializationError::LoggerSetupError` if the file cannot be opened,
/// or `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_to_file(
    level: LevelFilter,
    format: LogFormat,
    path: &Path,
) -> Result<(), InitializationError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            InitializationError::LoggerSetupError(format!(
                "cannot create log directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            InitializationError::LoggerSetupError(format!(
                "cannot open log file {}: {e}",
                path.display()
            ))
        })?;

    let mut builder = build_logger(level, format);
    builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

fn build_logger(level: LevelFilter, format: LogFormat) -> env_logger::Builder {
    colored::control::set_override(true);

    // Read from RUST_LOG environment variable first, then override with CLI arg
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    builder.filter_module("lettre", LevelFilter::Warn);
    // CDP event chatter is logged at error level for unknown events
    builder.filter_module("chromiumoxide", LevelFilter::Off);
    builder.filter_module("tungstenite", LevelFilter::Warn);
    builder.filter_module("link_checker", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let (emoji, level) = level_badge(record.level());
                writeln!(
                    buf,
                    "{} {} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    emoji,
                    record.target().cyan(),
                    level,
                    record.args()
                )
            });
        }
    }

    builder
}

/// Emoji and coloured name shown for `level` in plain output.
fn level_badge(level: Level) -> (&'static str, ColoredString) {
    let name = level.to_string();
    match level {
        Level::Error => ("❌", name.red()),
        Level::Warn => ("⚠️", name.yellow()),
        Level::Info => ("✔️", name.green()),
        Level::Debug => ("🔍", name.blue()),
        Level::Trace => ("🔬", name.purple()),
    }
}

/// Writes to stderr and to a file; the file copy has ANSI colour codes removed.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(&strip_ansi(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn strip_ansi(buf: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(buf);
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(&text, "").into_owned().into_bytes(),
        None => buf.to_vec(),
    }
}
