//! Run summary printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::FailureStats;
use crate::models::LinkStatus;
use crate::report::Report;

/// Number of distinct error messages listed in the summary.
const TOP_ERRORS: usize = 5;

/// Logs the summary of a finished check run.
///
/// Covers counts by status and category, detection methods, browser
/// statistics, average response times, the most common error messages,
/// and the per-kind failure counters.
pub fn print_run_summary(report: &Report, failure_stats: &FailureStats) {
    info!("=== Link check summary ===");
    info!("Total links: {}", report.total_links);
    info!(
        "Valid: {} ({}%)",
        report.valid_links, report.summary.valid_percentage
    );
    info!(
        "Problems: {} ({}%)",
        report.invalid_links, report.summary.invalid_percentage
    );

    if report.invalid_links > 0 {
        info!("Problems by status:");
        for status in LinkStatus::iter().filter(|s| *s != LinkStatus::Valid) {
            let count = match status {
                LinkStatus::Invalid => report.invalid_by_status.invalid,
                LinkStatus::Timeout => report.invalid_by_status.timeout,
                _ => report.invalid_by_status.error,
            };
            info!("   {status}: {count}");
        }
        info!("Problems by category:");
        for (category, count) in &report.invalid_by_category {
            info!("   {category}: {count}");
        }
    }

    let times = &report.avg_response_times;
    info!(
        "Average response time (ms): valid {}, invalid {}, timeout {}, error {}",
        times.valid, times.invalid, times.timeout, times.error
    );

    let methods = &report.method_stats;
    info!(
        "Valid by method: http {}, browser {}, browser-fallback {}",
        methods.http, methods.browser, methods.browser_fallback
    );
    if methods.browser_check_attempts > 0 {
        info!(
            "Browser checks: {} attempted, {} succeeded ({}%)",
            methods.browser_check_attempts, methods.browser, methods.browser_success_rate
        );
    }

    if let Some(proxy) = &report.proxy_info {
        info!("Proxy: {}://{}:{}", proxy.protocol, proxy.host, proxy.port);
    }

    let top = report.top_errors(TOP_ERRORS);
    if !top.is_empty() {
        info!("Most common errors:");
        for (message, count) in top {
            info!("   {count}x {message}");
        }
    }

    print_failure_statistics(failure_stats);
}

/// Logs every non-zero failure counter.
pub fn print_failure_statistics(failure_stats: &FailureStats) {
    let total = failure_stats.total();
    if total == 0 {
        return;
    }
    info!("Failure counts ({total} total):");
    for (kind, count) in failure_stats.non_zero() {
        info!("   {kind}: {count}");
    }
}
