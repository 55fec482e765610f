//! The `check` tool: load, check, report.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use crate::app::print_run_summary;
use crate::batch::{check_all_links, select_for_run};
use crate::browser::BrowserDriver;
use crate::checker::LinkChecker;
use crate::config::Settings;
use crate::loader::load_resources;
use crate::report::{save_report, Report, ReportPaths};

/// Results of a check run.
#[derive(Debug, Clone)]
pub struct CheckRun {
    /// Aggregated verdicts
    pub report: Report,
    /// Where the JSON report and its Markdown twin were written
    pub paths: ReportPaths,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Checks every link in the content store and writes a report.
///
/// Loads resources (falling back to the sample set), applies test mode,
/// checks them in batches, logs a summary, saves the JSON and Markdown
/// reports and prunes expired ones.
///
/// # Arguments
///
/// * `settings` - Complete configuration
/// * `driver` - Browser capability for the escalation layer
///
/// # Errors
///
/// Returns an error if the checker cannot be initialized (HTTP client or
/// special-site patterns) or the report cannot be written. Broken links are
/// never an error.
///
/// # Example
///
/// ```no_run
/// use link_checker::{run_check, DisabledDriver, Settings};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let run = run_check(&Settings::default(), Arc::new(DisabledDriver)).await?;
/// println!("{} of {} links valid", run.report.valid_links, run.report.total_links);
/// # Ok(())
/// # }
/// ```
pub async fn run_check(settings: &Settings, driver: Arc<dyn BrowserDriver>) -> Result<CheckRun> {
    let start_time = Instant::now();
    let checker = Arc::new(
        LinkChecker::new(settings, driver).context("Failed to initialize link checker")?,
    );

    let resources = load_resources(&settings.content.store_dir).await;
    info!("Loaded {} resources", resources.len());
    let resources = select_for_run(resources, &settings.link_checker.test_mode);

    let results = check_all_links(
        Arc::clone(&checker),
        resources,
        settings.link_checker.batch_size,
    )
    .await;

    let report = Report::build(&results, &settings.link_checker, Utc::now());
    print_run_summary(&report, checker.failure_stats());

    let paths = save_report(
        &report,
        &settings.link_checker,
        &settings.reporting.reports_dir,
        settings.reporting.report_retention_days,
    )
    .await
    .context("Failed to save link check report")?;

    Ok(CheckRun {
        report,
        paths,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
