//! Error type definitions.
//!
//! One `thiserror` enum per failure domain. Orchestration code wraps these in
//! `anyhow` with context.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::{Display, EnumIter as EnumIterMacro};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the logger with custom message (e.g., file creation).
    #[error("Logger initialization error: {0}")]
    LoggerSetupError(String),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A special-site pattern failed to compile.
    #[error("Invalid domain pattern for special site '{site}': {source}")]
    SitePatternError {
        site: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while reading one content collection.
///
/// The loader never propagates these; they downgrade to a warning and the
/// collection contributes zero (or partially recovered) entries.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while writing or reading report files.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid report JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by an external search backend.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] ReqwestError),
    #[error("search provider returned HTTP {0}")]
    Status(u16),
    #[error("missing search credential: {0}")]
    MissingCredentials(&'static str),
}

/// Errors raised by a browser session.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("navigation timeout after {0} ms")]
    NavigationTimeout(u64),
    #[error("page evaluation failed: {0}")]
    Evaluation(String),
    #[error("page evaluation timeout after {0} ms")]
    EvaluationTimeout(u64),
    #[error("browser close failed: {0}")]
    Close(String),
}

/// Errors raised while delivering a notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("no recipients configured")]
    NoRecipients,
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Failure signatures counted across a run.
///
/// Each failed HTTP or browser attempt is tallied under one kind so the run
/// summary can show where links break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Display)]
pub enum FailureKind {
    #[strum(serialize = "HTTP timeout")]
    HttpTimeout,
    #[strum(serialize = "HTTP connect error")]
    HttpConnect,
    #[strum(serialize = "HTTP redirect error")]
    HttpRedirect,
    #[strum(serialize = "HTTP request error")]
    HttpRequest,
    #[strum(serialize = "HTTP body error")]
    HttpBody,
    #[strum(serialize = "HTTP other error")]
    HttpOther,
    #[strum(serialize = "HTTP invalid status")]
    HttpInvalidStatus,
    #[strum(serialize = "Browser launch error")]
    BrowserLaunch,
    #[strum(serialize = "Browser navigation error")]
    BrowserNavigation,
    #[strum(serialize = "Browser timeout")]
    BrowserTimeout,
    #[strum(serialize = "Browser empty content")]
    BrowserEmptyContent,
    #[strum(serialize = "Browser invalid status")]
    BrowserInvalidStatus,
    #[strum(serialize = "Check task panicked")]
    TaskPanic,
}
