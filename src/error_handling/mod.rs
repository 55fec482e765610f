//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error type definitions for each failure domain
//! - Categorization of HTTP and browser failures into link statuses
//! - Fixed-interval retry strategy
//! - Thread-safe failure counters

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    classify_browser_error, classify_http_error, describe_error_chain, fixed_retry_strategy,
    is_connection_refused, HttpFailure,
};
pub use stats::FailureStats;
pub use types::{
    BrowserError, ConfigError, FailureKind, InitializationError, LoaderError, NotifyError,
    ReportError, SearchError,
};
