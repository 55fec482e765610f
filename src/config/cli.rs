//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::DEFAULT_CONFIG_FILE;
use crate::config::types::{LogFormat, LogLevel, Settings};

/// Validates the outbound links of a curated resource directory.
#[derive(Debug, Parser)]
#[command(name = "link_checker", version, about)]
pub struct Cli {
    /// TOML configuration file; built-in defaults apply when it is missing
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check every link and write a report
    Check(CheckArgs),
    /// Suggest replacements for the problem links of a report
    Suggest(SuggestArgs),
    /// Check, suggest on problems, notify, and rotate logs
    Scheduled,
}

#[derive(Debug, Default, Args)]
pub struct CheckArgs {
    /// Check only a random sample of links
    #[arg(long)]
    pub test_mode: bool,

    /// Sample size in test mode (implies --test-mode)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip the headless browser layer
    #[arg(long)]
    pub no_browser: bool,
}

impl CheckArgs {
    /// Applies the command-line overrides to `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        let test_mode = &mut settings.link_checker.test_mode;
        if self.test_mode || self.limit.is_some() {
            test_mode.enabled = true;
        }
        if let Some(limit) = self.limit {
            test_mode.limit_count = limit;
        }
        if self.no_browser {
            settings.link_checker.layered_checking.headless_browser.enabled = false;
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct SuggestArgs {
    /// Report to read; defaults to the latest report in the reports directory
    #[arg(long)]
    pub report: Option<PathBuf>,
}
