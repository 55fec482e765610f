//! Main application modules.
//!
//! This module provides utilities for URL validation, progress logging and
//! run-summary printing used by the tools.

pub mod logging;
pub mod statistics;
pub mod url;

// Re-export public API
pub use logging::{log_progress, percentage};
pub use statistics::{print_failure_statistics, print_run_summary};
pub use url::{host_of, validate_and_normalize_url};
