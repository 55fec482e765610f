//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (stderr, optionally teed into a daily log file)
//! - HTTP clients for link checking and search providers
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_search_client};
pub use logger::{init_logger_to_file, init_logger_with};
