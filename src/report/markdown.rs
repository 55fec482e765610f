//! Human-readable Markdown twin of a [`Report`].

use crate::config::{CheckerSettings, UNCATEGORIZED};
use crate::models::CheckResult;

use super::Report;

/// Renders `report` as Markdown.
///
/// `settings` supplies the "Check configuration" section; the report itself
/// only records what was found.
pub fn render_markdown(report: &Report, settings: &CheckerSettings) -> String {
    let mut lines = vec![
        "# Link Check Report".to_string(),
        format!("Generated: {}", report.timestamp),
        String::new(),
        "## Summary".to_string(),
        format!("- Total links: {}", report.total_links),
        format!(
            "- Valid links: {} ({}%)",
            report.valid_links, report.summary.valid_percentage
        ),
        format!(
            "- Problem links: {} ({}%)",
            report.invalid_links, report.summary.invalid_percentage
        ),
        String::new(),
        "### Problem breakdown".to_string(),
        format!("- Invalid status code: {}", report.invalid_by_status.invalid),
        format!("- Timed out: {}", report.invalid_by_status.timeout),
        format!("- Connection error: {}", report.invalid_by_status.error),
        String::new(),
        "### Detection methods".to_string(),
        format!("- Valid via HTTP: {}", report.method_stats.http),
        format!("- Valid via browser: {}", report.method_stats.browser),
    ];

    let stats = &report.method_stats;
    if stats.browser_fallback > 0 {
        lines.push(format!("- Valid via browser fallback: {}", stats.browser_fallback));
    }
    if stats.browser_check_attempts > 0 {
        lines.push(String::new());
        lines.push("### Headless browser checks".to_string());
        lines.push(format!("- Attempted: {}", stats.browser_check_attempts));
        lines.push(format!("- Succeeded: {}", stats.browser));
        lines.push(format!("- Success rate: {}%", stats.browser_success_rate));
    }

    lines.push(String::new());
    lines.push("### Problem links by category".to_string());
    if report.invalid_by_category.is_empty() {
        lines.push("- none".to_string());
    }
    for (category, count) in &report.invalid_by_category {
        lines.push(format!("- {category}: {count}"));
    }

    if report.test_mode_enabled {
        lines.push(String::new());
        lines.push("### Test mode".to_string());
        lines.push(format!(
            "- Test mode was enabled; only {} links were checked",
            report.test_mode_limit_count.unwrap_or(report.total_links)
        ));
        lines.push(
            "- Set `link_checker.test_mode.enabled = false` to check every link".to_string(),
        );
    }

    lines.push(String::new());
    lines.push("## Problem links".to_string());
    lines.push(String::new());
    if report.problem_links.is_empty() {
        lines.push("No problem links found; every link is valid.".to_string());
        lines.push(String::new());
    }
    for (index, link) in report.problem_links.iter().enumerate() {
        push_problem_link(&mut lines, index + 1, link);
    }

    push_configuration(&mut lines, settings);

    lines.push(String::new());
    lines.push("## Next steps".to_string());
    lines.push(String::new());
    lines.push("Generate replacement suggestions for the problem links with:".to_string());
    lines.push("```bash".to_string());
    lines.push("link_checker suggest".to_string());
    lines.push("```".to_string());

    lines.join("\n")
}

fn push_problem_link(lines: &mut Vec<String>, number: usize, link: &CheckResult) {
    lines.push(format!("### {number}. {}", link.title));
    lines.push(format!("- ID: {}", link.id));
    lines.push(format!(
        "- Category: {}",
        link.category.as_deref().unwrap_or(UNCATEGORIZED)
    ));
    lines.push(format!("- Link: {}", link.link));
    match link.status_code {
        Some(code) => lines.push(format!("- Problem: {} (HTTP {code})", link.status)),
        None => lines.push(format!("- Problem: {}", link.status)),
    }
    if let Some(message) = &link.error_message {
        lines.push(format!("- Error: {message}"));
    }
    if let Some(ms) = link.response_time {
        lines.push(format!("- Response time: {ms}ms"));
    }
    if let Some(content_type) = &link.content_type {
        lines.push(format!("- Content type: {content_type}"));
    }
    if let Some(last_modified) = &link.last_modified {
        lines.push(format!("- Last modified: {last_modified}"));
    }
    if link.attempts > 0 {
        lines.push(format!("- HTTP attempts: {}", link.attempts));
    }

    if let Some(browser) = &link.browser_check {
        lines.push(String::new());
        lines.push("#### Browser check".to_string());
        lines.push(format!("- Status: {}", browser.status));
        if let Some(code) = browser.status_code {
            lines.push(format!("- Status code: {code}"));
        }
        if let Some(message) = &browser.error_message {
            lines.push(format!("- Error: {message}"));
        }
    }

    if !link.logs.is_empty() {
        lines.push(String::new());
        lines.push("#### Diagnostic log".to_string());
        lines.push("```".to_string());
        lines.extend(link.logs.iter().cloned());
        lines.push("```".to_string());
    }
    lines.push(String::new());
}

fn push_configuration(lines: &mut Vec<String>, settings: &CheckerSettings) {
    lines.push("## Check configuration".to_string());
    lines.push(String::new());
    lines.push(format!("- Request timeout: {}ms", settings.timeout_ms));
    lines.push(format!("- Batch size: {}", settings.batch_size));
    match settings.proxy.url() {
        Some(url) => {
            lines.push("- Proxy: enabled".to_string());
            lines.push(format!("  - Address: {url}"));
        }
        None => lines.push("- Proxy: disabled".to_string()),
    }
    lines.push(format!("- Retries: {}", settings.retry.max_retries));
    let codes: Vec<String> = settings
        .valid_status_codes
        .iter()
        .map(u16::to_string)
        .collect();
    lines.push(format!("- Valid status codes: {}", codes.join(", ")));

    if settings.layered_checking.enabled {
        let browser = &settings.layered_checking.headless_browser;
        lines.push(String::new());
        lines.push("### Headless browser".to_string());
        lines.push(format!(
            "- Status: {}",
            if browser.enabled { "enabled" } else { "disabled" }
        ));
        lines.push(format!("- Timeout: {}ms", browser.timeout_ms));
        lines.push(format!("- Settle delay: {}ms", browser.wait_until_ms));
        lines.push(format!("- Detection method: {}", browser.detection_method));
        lines.push(format!("- Retries: {}", browser.retries));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrowserCheck, CheckMethod, LinkStatus, Resource};
    use chrono::{TimeZone, Utc};

    fn broken() -> CheckResult {
        let resource = Resource::new("m1", "Broken Model", "https://broken.example", None);
        let mut result = CheckResult::pending(&resource);
        result.status = LinkStatus::Invalid;
        result.status_code = Some(404);
        result.method = Some(CheckMethod::Browser);
        result.attempts = 3;
        result.error_message = Some("HTTP: Invalid status code: 404; Browser: Invalid status code: 404".into());
        result.browser_check = Some(BrowserCheck::failed(
            LinkStatus::Invalid,
            Some(404),
            "Invalid status code: 404".into(),
        ));
        result.logs = vec!["[2024-03-09T12:30:45.000Z] Checking".into()];
        result
    }

    fn render(results: &[CheckResult], settings: &CheckerSettings) -> String {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 45).unwrap();
        render_markdown(&Report::build(results, settings, at), settings)
    }

    #[test]
    fn test_problem_link_section() {
        let markdown = render(&[broken()], &CheckerSettings::default());
        assert!(markdown.contains("### 1. Broken Model"));
        assert!(markdown.contains("- Category: Uncategorized"));
        assert!(markdown.contains("- Problem: invalid (HTTP 404)"));
        assert!(markdown.contains("- HTTP attempts: 3"));
        assert!(markdown.contains("#### Browser check"));
        assert!(markdown.contains("```\n[2024-03-09T12:30:45.000Z] Checking\n```"));
        assert!(markdown.contains("### Headless browser checks"));
    }

    #[test]
    fn test_clean_run_and_configuration() {
        let mut settings = CheckerSettings::default();
        settings.test_mode.enabled = true;
        settings.test_mode.limit_count = 3;
        let markdown = render(&[], &settings);
        assert!(markdown.contains("No problem links found"));
        assert!(markdown.contains("only 3 links were checked"));
        assert!(markdown.contains("- Proxy: disabled"));
        assert!(markdown.contains("## Check configuration"));
        assert!(markdown.contains("- Valid status codes: 200, 201"));
        assert!(markdown.trim_end().ends_with("```"));
    }
}
