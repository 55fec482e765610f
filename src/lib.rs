//! link_checker library: outbound link validation for a curated resource directory
//!
//! This library checks every link in a content store with a layered protocol
//! (HTTP HEAD/GET with retries, then an optional headless-browser render),
//! writes JSON and Markdown reports, suggests replacements for broken links
//! and can run the whole pipeline on a schedule with email notifications.
//!
//! # Example
//!
//! ```no_run
//! use link_checker::{default_driver, load_settings, run_check};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_settings(Path::new("link_checker.toml"))?;
//! let run = run_check(&settings, default_driver()).await?;
//! println!(
//!     "Checked {} links: {} valid, {} problems",
//!     run.report.total_links, run.report.valid_links, run.report.invalid_links
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod batch;
pub mod browser;
pub mod checker;
pub mod config;
mod error_handling;
pub mod initialization;
pub mod loader;
pub mod models;
pub mod report;
mod run;
pub mod schedule;
pub mod suggest;

// Re-export public API
pub use browser::{
    default_driver, BrowserDriver, BrowserSession, DisabledDriver, LaunchOptions, PageSnapshot,
};
pub use checker::LinkChecker;
pub use config::{load_settings, LogFormat, LogLevel, Settings};
pub use error_handling::{
    BrowserError, ConfigError, FailureKind, FailureStats, InitializationError, LoaderError,
    NotifyError, ReportError, SearchError,
};
pub use models::{BrowserCheck, CheckMethod, CheckResult, LinkStatus, Resource};
pub use report::Report;
pub use run::{run_check, run_scheduled, run_suggest, CheckRun, ScheduledOutcome, SuggestRun};
pub use schedule::{EmailNotifier, Notifier};
