//! Report aggregation and persistence.
//!
//! A [`Report`] is computed once per check run from the full list of
//! [`CheckResult`]s. It is written as a pretty-printed JSON snapshot plus a
//! Markdown twin, after which report files older than the retention window
//! are pruned.

mod files;
mod markdown;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::percentage;
use crate::config::{CheckerSettings, REPORT_JSON_PREFIX, REPORT_MARKDOWN_PREFIX};
use crate::error_handling::ReportError;
use crate::models::{CheckMethod, CheckResult, LinkStatus};

pub use files::{
    cleanup_old_reports, file_stamp, find_latest_report, read_json, timestamp_of, write_artifacts,
    ReportPaths,
};
pub use markdown::render_markdown;

/// Counts of problem links per failure status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub invalid: usize,
    pub timeout: usize,
    pub error: usize,
}

impl StatusBreakdown {
    pub fn total(&self) -> usize {
        self.invalid + self.timeout + self.error
    }
}

/// Valid verdicts per detection method, plus browser-layer totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodStats {
    pub http: usize,
    pub browser: usize,
    pub browser_fallback: usize,
    /// Links for which the browser layer ran at all
    pub browser_check_attempts: usize,
    pub browser_success_rate: u32,
}

/// Mean response time in milliseconds per final status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTimes {
    pub valid: u64,
    pub invalid: u64,
    pub timeout: u64,
    pub error: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub valid_percentage: u32,
    pub invalid_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyInfo {
    pub enabled: bool,
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

/// Compact projection of every checked link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub id: String,
    pub title: String,
    pub link: String,
    pub category: Option<String>,
    pub status: LinkStatus,
    pub status_code: Option<u16>,
    pub response_time: Option<u64>,
    pub method: Option<CheckMethod>,
}

impl From<&CheckResult> for LinkSummary {
    fn from(result: &CheckResult) -> Self {
        Self {
            id: result.id.clone(),
            title: result.title.clone(),
            link: result.link.clone(),
            category: result.category.clone(),
            status: result.status,
            status_code: result.status_code,
            response_time: result.response_time,
            method: result.method,
        }
    }
}

/// Aggregate of one check run.
///
/// Always satisfies `valid_links + invalid_links == total_links` and
/// `invalid_by_status.total() == invalid_links`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// ISO-8601 UTC with milliseconds
    pub timestamp: String,
    pub total_links: usize,
    pub valid_links: usize,
    pub invalid_links: usize,
    pub invalid_by_status: StatusBreakdown,
    pub invalid_by_category: BTreeMap<String, usize>,
    pub method_stats: MethodStats,
    pub avg_response_times: ResponseTimes,
    pub summary: Summary,
    pub test_mode_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_mode_limit_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_info: Option<ProxyInfo>,
    /// Full records, diagnostic trail included, for every non-valid link
    pub problem_links: Vec<CheckResult>,
    pub all_links: Vec<LinkSummary>,
}

impl Report {
    /// Aggregates `results` into a report stamped with `generated_at`.
    pub fn build(
        results: &[CheckResult],
        settings: &CheckerSettings,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let total_links = results.len();
        let valid_links = results.iter().filter(|r| r.is_valid()).count();
        let invalid_links = total_links - valid_links;

        let mut invalid_by_status = StatusBreakdown::default();
        let mut invalid_by_category = BTreeMap::new();
        for result in results.iter().filter(|r| !r.is_valid()) {
            match result.status {
                LinkStatus::Invalid => invalid_by_status.invalid += 1,
                LinkStatus::Timeout => invalid_by_status.timeout += 1,
                LinkStatus::Error | LinkStatus::Valid => invalid_by_status.error += 1,
            }
            *invalid_by_category
                .entry(result.category_or_default().to_string())
                .or_insert(0) += 1;
        }

        let proxy = &settings.proxy;
        Self {
            timestamp: iso_timestamp(generated_at),
            total_links,
            valid_links,
            invalid_links,
            invalid_by_status,
            invalid_by_category,
            method_stats: method_stats(results),
            avg_response_times: ResponseTimes {
                valid: average_response_time(results, LinkStatus::Valid),
                invalid: average_response_time(results, LinkStatus::Invalid),
                timeout: average_response_time(results, LinkStatus::Timeout),
                error: average_response_time(results, LinkStatus::Error),
            },
            summary: Summary {
                valid_percentage: percentage(valid_links, total_links),
                invalid_percentage: percentage(invalid_links, total_links),
            },
            test_mode_enabled: settings.test_mode.enabled,
            test_mode_limit_count: settings
                .test_mode
                .enabled
                .then_some(settings.test_mode.limit_count),
            proxy_info: proxy.enabled.then(|| ProxyInfo {
                enabled: true,
                protocol: proxy.protocol.clone(),
                host: proxy.host.clone(),
                port: proxy.port,
            }),
            problem_links: results.iter().filter(|r| !r.is_valid()).cloned().collect(),
            all_links: results.iter().map(LinkSummary::from).collect(),
        }
    }

    /// The most frequent error messages among problem links, by first line.
    ///
    /// Sorted by count (descending), then message, at most `limit` entries.
    pub fn top_errors(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for link in &self.problem_links {
            if let Some(message) = &link.error_message {
                let first_line = message.lines().next().unwrap_or_default().to_string();
                *counts.entry(first_line).or_insert(0) += 1;
            }
        }
        let mut sorted: Vec<_> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(limit);
        sorted
    }
}

fn method_stats(results: &[CheckResult]) -> MethodStats {
    let valid_with = |method: CheckMethod| {
        results
            .iter()
            .filter(|r| r.is_valid() && r.method == Some(method))
            .count()
    };
    let browser = valid_with(CheckMethod::Browser);
    let browser_check_attempts = results.iter().filter(|r| r.browser_check.is_some()).count();
    MethodStats {
        http: valid_with(CheckMethod::Http),
        browser,
        browser_fallback: valid_with(CheckMethod::BrowserFallback),
        browser_check_attempts,
        browser_success_rate: percentage(browser, browser_check_attempts),
    }
}

/// Rounded mean response time for `status`; missing times count as 0.
fn average_response_time(results: &[CheckResult], status: LinkStatus) -> u64 {
    let times: Vec<u64> = results
        .iter()
        .filter(|r| r.status == status)
        .map(|r| r.response_time.unwrap_or(0))
        .collect();
    if times.is_empty() {
        return 0;
    }
    (times.iter().sum::<u64>() as f64 / times.len() as f64).round() as u64
}

/// Formats `at` as ISO-8601 UTC with milliseconds.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Writes `report` (JSON and Markdown) into `reports_dir`, then prunes
/// report files older than `retention_days`.
///
/// Cleanup failures are logged and do not fail the write.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or either file cannot
/// be written.
pub async fn save_report(
    report: &Report,
    settings: &CheckerSettings,
    reports_dir: &std::path::Path,
    retention_days: u64,
) -> Result<ReportPaths, ReportError> {
    let markdown = render_markdown(report, settings);
    let paths = write_artifacts(
        reports_dir,
        REPORT_JSON_PREFIX,
        REPORT_MARKDOWN_PREFIX,
        &file_stamp(&report.timestamp),
        report,
        &markdown,
    )
    .await?;
    log::info!("Report saved to {}", paths.json.display());
    log::info!("Readable report saved to {}", paths.markdown.display());

    match cleanup_old_reports(reports_dir, retention_days, Utc::now()).await {
        Ok(0) => {}
        Ok(removed) => log::info!("Removed {removed} report files older than {retention_days} days"),
        Err(e) => log::warn!("Report cleanup failed: {e}"),
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrowserCheck, Resource};
    use chrono::TimeZone;

    fn result(id: &str, status: LinkStatus, method: Option<CheckMethod>, category: Option<&str>) -> CheckResult {
        let resource = Resource::new(id, format!("Title {id}"), format!("https://{id}.example"), category);
        let mut result = CheckResult::pending(&resource);
        result.status = status;
        result.method = method;
        result
    }

    fn sample_results() -> Vec<CheckResult> {
        let mut browser_valid = result("b", LinkStatus::Valid, Some(CheckMethod::Browser), Some("Models"));
        browser_valid.browser_check = Some(BrowserCheck {
            status: LinkStatus::Valid,
            status_code: Some(200),
            error_message: None,
        });
        let mut browser_failed = result("c", LinkStatus::Timeout, Some(CheckMethod::Browser), None);
        browser_failed.browser_check = Some(BrowserCheck::failed(
            LinkStatus::Timeout,
            None,
            "navigation timeout after 15000 ms".into(),
        ));
        browser_failed.error_message = Some("HTTP: timed out\nmore".into());
        let mut http_valid = result("a", LinkStatus::Valid, Some(CheckMethod::Http), Some("Models"));
        http_valid.response_time = Some(100);
        let mut invalid = result("d", LinkStatus::Invalid, Some(CheckMethod::Http), Some("Datasets"));
        invalid.error_message = Some("Invalid status code: 404".into());
        invalid.response_time = Some(51);
        let mut error = result("e", LinkStatus::Error, None, Some("Datasets"));
        error.error_message = Some("Invalid status code: 404".into());
        vec![http_valid, browser_valid, browser_failed, invalid, error]
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_report_arithmetic() {
        let report = Report::build(&sample_results(), &CheckerSettings::default(), at());
        assert_eq!(report.total_links, 5);
        assert_eq!(report.valid_links + report.invalid_links, report.total_links);
        assert_eq!(report.invalid_by_status.total(), report.invalid_links);
        assert_eq!(
            report.invalid_by_status,
            StatusBreakdown {
                invalid: 1,
                timeout: 1,
                error: 1
            }
        );
        assert_eq!(report.problem_links.len(), 3);
        assert_eq!(report.all_links.len(), 5);
        assert_eq!(report.summary.valid_percentage, 40);
        assert_eq!(report.summary.invalid_percentage, 60);
    }

    #[test]
    fn test_report_categories_and_methods() {
        let report = Report::build(&sample_results(), &CheckerSettings::default(), at());
        assert_eq!(report.invalid_by_category.get("Datasets"), Some(&2));
        assert_eq!(report.invalid_by_category.get("Uncategorized"), Some(&1));
        assert_eq!(report.method_stats.http, 1);
        assert_eq!(report.method_stats.browser, 1);
        assert_eq!(report.method_stats.browser_fallback, 0);
        assert_eq!(report.method_stats.browser_check_attempts, 2);
        assert_eq!(report.method_stats.browser_success_rate, 50);
    }

    #[test]
    fn test_average_response_times() {
        let report = Report::build(&sample_results(), &CheckerSettings::default(), at());
        // valid: (100 + 0) / 2
        assert_eq!(report.avg_response_times.valid, 50);
        assert_eq!(report.avg_response_times.invalid, 51);
        assert_eq!(report.avg_response_times.timeout, 0);
    }

    #[test]
    fn test_empty_report() {
        let report = Report::build(&[], &CheckerSettings::default(), at());
        assert_eq!(report.total_links, 0);
        assert_eq!(report.summary, Summary::default());
        assert_eq!(report.method_stats.browser_success_rate, 0);
        assert!(report.problem_links.is_empty());
    }

    #[test]
    fn test_timestamp_and_optional_sections() {
        let mut settings = CheckerSettings::default();
        settings.proxy.enabled = true;
        settings.test_mode.enabled = true;
        settings.test_mode.limit_count = 7;
        let report = Report::build(&[], &settings, at());
        assert_eq!(report.timestamp, "2024-03-09T12:30:45.000Z");
        assert_eq!(report.test_mode_limit_count, Some(7));
        assert_eq!(report.proxy_info.as_ref().map(|p| p.port), Some(settings.proxy.port));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("proxyInfo").is_some());
        assert!(json.get("invalidByStatus").is_some());
        assert!(json["methodStats"].get("browserSuccessRate").is_some());

        let plain = Report::build(&[], &CheckerSettings::default(), at());
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("proxyInfo").is_none());
    }

    #[test]
    fn test_top_errors_uses_first_line() {
        let report = Report::build(&sample_results(), &CheckerSettings::default(), at());
        let top = report.top_errors(5);
        assert_eq!(top[0], ("Invalid status code: 404".to_string(), 2));
        assert_eq!(top[1], ("HTTP: timed out".to_string(), 1));
    }
}
