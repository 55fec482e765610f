//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `link_checker` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Configuration and logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use log::error;

use link_checker::config::{Cli, Command};
use link_checker::initialization::{init_logger_to_file, init_logger_with};
use link_checker::schedule::daily_log_path;
use link_checker::{
    default_driver, load_settings, run_check, run_scheduled, run_suggest, BrowserDriver,
    DisabledDriver, EmailNotifier,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    let mut settings = match load_settings(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("link_checker error: {e}");
            process::exit(1);
        }
    };

    let logger = match cli.command {
        Command::Scheduled => {
            let path = daily_log_path(&settings.logging.logs_dir, Utc::now().date_naive());
            init_logger_to_file(cli.log_level.clone().into(), cli.log_format.clone(), &path)
        }
        _ => init_logger_with(cli.log_level.clone().into(), cli.log_format.clone()),
    };
    if let Err(e) = logger.context("Failed to initialize logger") {
        eprintln!("link_checker error: {e:#}");
        process::exit(1);
    }

    match cli.command {
        Command::Check(args) => {
            args.apply(&mut settings);
            let driver: Arc<dyn BrowserDriver> = if args.no_browser {
                Arc::new(DisabledDriver)
            } else {
                default_driver()
            };
            match run_check(&settings, driver).await {
                Ok(run) => {
                    println!(
                        "✅ Checked {} link{} ({} valid, {} problems) in {:.1}s",
                        run.report.total_links,
                        if run.report.total_links == 1 { "" } else { "s" },
                        run.report.valid_links,
                        run.report.invalid_links,
                        run.elapsed_seconds
                    );
                    println!("Report saved to {}", run.paths.markdown.display());
                }
                Err(e) => {
                    error!("Link check failed: {e:?}");
                    println!("Link check finished with errors");
                }
            }
        }
        Command::Suggest(args) => match run_suggest(&settings, args.report.as_deref()).await {
            Ok(Some(run)) => {
                println!(
                    "✅ Suggested alternatives for {} of {} problem links",
                    run.report.alternatives_found, run.report.total_problem_links
                );
                println!("Suggestions saved to {}", run.paths.markdown.display());
            }
            Ok(None) => println!("No problem links to suggest alternatives for"),
            Err(e) => {
                error!("Suggestion generation failed: {e:?}");
                println!("Suggestion generation finished with errors");
            }
        },
        Command::Scheduled => {
            let notifier = EmailNotifier::new(&settings.notifications.email);
            let outcome = run_scheduled(&settings, default_driver(), &notifier).await;
            match (&outcome.check, &outcome.error) {
                (Some(run), _) => println!(
                    "✅ Scheduled check complete: {} problems among {} links",
                    run.report.invalid_links, run.report.total_links
                ),
                (None, Some(_)) => println!("Scheduled check finished with errors"),
                (None, None) => println!("Scheduled check finished"),
            }
        }
    }
}
