//! The `suggest` tool: alternatives for the problem links of a report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use crate::config::{
    Settings, ALTERNATIVES_JSON_PREFIX, ALTERNATIVES_MARKDOWN_PREFIX, SEARCH_REQUEST_TIMEOUT,
};
use crate::initialization::init_search_client;
use crate::report::{file_stamp, find_latest_report, iso_timestamp, read_json, write_artifacts, ReportPaths};
use crate::suggest::{
    backend_from_settings, render_alternatives_markdown, AlternativeFinder, AlternativesReport,
    OriginalReport, SourceReport,
};

/// Results of a suggester run.
#[derive(Debug, Clone)]
pub struct SuggestRun {
    /// Suggestions per problem link
    pub report: AlternativesReport,
    /// Where the alternatives JSON and Markdown were written
    pub paths: ReportPaths,
    /// The link check report the problem links came from
    pub source: PathBuf,
}

/// Suggests replacements for the problem links of a link check report.
///
/// Reads `report_path` when given, otherwise the latest report in the
/// reports directory (by filename).
///
/// # Returns
///
/// `Ok(None)` when there is no report to read or it lists no problem links.
///
/// # Errors
///
/// Returns an error if the report cannot be read or parsed, or the output
/// cannot be written. Search failures are not errors.
pub async fn run_suggest(settings: &Settings, report_path: Option<&Path>) -> Result<Option<SuggestRun>> {
    let reports_dir = &settings.reporting.reports_dir;
    let source = match report_path {
        Some(path) => path.to_path_buf(),
        None => match find_latest_report(reports_dir).await {
            Some(path) => path,
            None => {
                info!(
                    "No link check report found in {}; run the checker first",
                    reports_dir.display()
                );
                return Ok(None);
            }
        },
    };
    info!("Using report {}", source.display());

    let source_report: SourceReport = read_json(&source)
        .await
        .with_context(|| format!("Failed to read report {}", source.display()))?;
    if source_report.problem_links.is_empty() {
        info!("The report lists no problem links");
        return Ok(None);
    }
    info!(
        "Finding alternatives for {} problem links",
        source_report.problem_links.len()
    );

    let suggestion = &settings.alternative_suggestion;
    let client =
        init_search_client(SEARCH_REQUEST_TIMEOUT).context("Failed to initialize search client")?;
    let finder = AlternativeFinder::new(
        backend_from_settings(suggestion, client),
        suggestion.max_results,
        Duration::from_millis(suggestion.delay_between_searches_ms),
    );
    let results = finder.find_all(&source_report.problem_links).await;

    let report = AlternativesReport::new(
        iso_timestamp(Utc::now()),
        OriginalReport {
            timestamp: source_report.timestamp,
            path: source.display().to_string(),
        },
        results,
    );
    let markdown = render_alternatives_markdown(&report);
    let paths = write_artifacts(
        reports_dir,
        ALTERNATIVES_JSON_PREFIX,
        ALTERNATIVES_MARKDOWN_PREFIX,
        &file_stamp(&report.timestamp),
        &report,
        &markdown,
    )
    .await
    .context("Failed to save alternatives report")?;
    info!("Alternatives saved to {}", paths.json.display());
    info!("Readable alternatives saved to {}", paths.markdown.display());

    Ok(Some(SuggestRun {
        report,
        paths,
        source,
    }))
}
