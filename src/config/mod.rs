//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, file-name prefixes)
//! - The TOML-backed [`Settings`] tree
//! - The command-line interface
//! - Special-site policy resolution

mod cli;
mod constants;
mod load;
mod special_sites;
mod types;

pub use cli::{CheckArgs, Cli, Command, SuggestArgs};
// Re-export all constants
pub use constants::*;
pub use load::{apply_env_overrides, load_settings, parse_settings};
pub use special_sites::{SiteMatcher, SitePolicy};
pub use types::{
    CheckerSettings, ContentSettings, DetectionMethod, EmailSettings, HeadlessBrowserSettings,
    LayeredCheckingSettings, LogFormat, LogLevel, LoggingSettings, NotificationSettings,
    ProxySettings, ReportingSettings, RetrySettings, SearchProvider, Settings,
    SpecialSiteSettings, SuggestionSettings, TestModeSettings,
};
