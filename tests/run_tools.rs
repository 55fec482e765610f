//! End-to-end tests for the check, suggest and scheduled tools.
//!
//! Each test gets its own content store and reports directory under a
//! `TempDir`; links point at an `httptest` server or a closed local port.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;

use link_checker::config::SpecialSiteSettings;
use link_checker::report::read_json;
use link_checker::{
    run_check, run_scheduled, run_suggest, DisabledDriver, LinkStatus, Notifier, NotifyError,
    Report, Resource, Settings,
};

#[path = "helpers.rs"]
mod helpers;

use helpers::{closed_port_url, test_settings, with_dirs, write_store};

/// Records every notification instead of sending it.
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(subject, _)| subject.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), html_body.to_string()));
        Ok(())
    }
}

/// One valid, one 404 and one unreachable link.
fn mixed_store(server: &Server, settings: &Settings) {
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/ok"))
            .times(..)
            .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/gone"))
            .times(..)
            .respond_with(status_code(404)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/gone"))
            .times(..)
            .respond_with(status_code(404)),
    );
    write_store(
        settings,
        &[
            Resource::new("ok", "Working Model", server.url_str("/ok"), Some("Models")),
            Resource::new("gone", "Gone Model", server.url_str("/gone"), Some("Models")),
            Resource::new("down", "Down Dataset", closed_port_url(), None),
        ],
    );
}

#[tokio::test]
async fn test_run_check_writes_consistent_report() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    let server = Server::run();
    mixed_store(&server, &settings);

    let run = run_check(&settings, Arc::new(DisabledDriver))
        .await
        .expect("Check run should succeed");
    let report = &run.report;

    assert_eq!(report.total_links, 3);
    assert_eq!(report.valid_links, 1);
    assert_eq!(report.invalid_links, 2);
    assert_eq!(report.valid_links + report.invalid_links, report.total_links);
    assert_eq!(report.invalid_by_status.total(), report.invalid_links);
    assert_eq!(report.invalid_by_status.invalid, 1);
    assert_eq!(report.invalid_by_status.error, 1);
    assert_eq!(report.invalid_by_category.get("Models"), Some(&1));
    assert_eq!(report.invalid_by_category.get("Uncategorized"), Some(&1));
    assert_eq!(report.method_stats.http, 1);
    assert_eq!(report.problem_links.len(), 2);
    assert!(report.problem_links.iter().all(|r| r.status != LinkStatus::Valid));
    assert!(report.problem_links.iter().all(|r| !r.logs.is_empty()));
    assert_eq!(report.all_links.len(), 3);
    assert!(!report.test_mode_enabled);

    let json_name = run.paths.json.file_name().unwrap().to_string_lossy().to_string();
    assert!(json_name.starts_with("link-check-report-"), "{json_name}");
    assert!(json_name.ends_with(".json"));
    let markdown_name = run.paths.markdown.file_name().unwrap().to_string_lossy().to_string();
    assert!(markdown_name.starts_with("link-check-readable-"), "{markdown_name}");

    let saved: Report = read_json(&run.paths.json).await.expect("Report should parse");
    assert_eq!(&saved, report);
    let markdown = std::fs::read_to_string(&run.paths.markdown).expect("Markdown should exist");
    assert!(markdown.contains("Gone Model"));
}

#[tokio::test]
async fn test_run_check_test_mode_limits_sample() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut settings = with_dirs(test_settings(), temp_dir.path());
    settings.link_checker.test_mode.enabled = true;
    settings.link_checker.test_mode.limit_count = 2;
    let server = Server::run();
    mixed_store(&server, &settings);

    let run = run_check(&settings, Arc::new(DisabledDriver))
        .await
        .expect("Check run should succeed");

    assert_eq!(run.report.total_links, 2);
    assert!(run.report.test_mode_enabled);
    assert_eq!(run.report.test_mode_limit_count, Some(2));
}

#[tokio::test]
async fn test_run_check_fails_on_bad_site_pattern() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut settings = with_dirs(test_settings(), temp_dir.path());
    settings.link_checker.special_sites.insert(
        "broken".to_string(),
        SpecialSiteSettings {
            domain_pattern: "(unclosed".to_string(),
            ..SpecialSiteSettings::default()
        },
    );

    let result = run_check(&settings, Arc::new(DisabledDriver)).await;

    assert!(result.is_err());
    assert!(!settings.reporting.reports_dir.exists());
}

#[tokio::test]
async fn test_run_suggest_uses_latest_report() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    let server = Server::run();
    mixed_store(&server, &settings);
    let check = run_check(&settings, Arc::new(DisabledDriver))
        .await
        .expect("Check run should succeed");

    let run = run_suggest(&settings, None)
        .await
        .expect("Suggest run should succeed")
        .expect("Problem links should produce suggestions");

    assert_eq!(run.source, check.paths.json);
    assert_eq!(run.report.total_problem_links, 2);
    assert_eq!(run.report.alternatives_found, 2);
    assert_eq!(run.report.without_alternatives, 0);
    assert_eq!(
        run.report.original_report.timestamp.as_deref(),
        Some(check.report.timestamp.as_str())
    );
    let name = run.paths.json.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("link-alternatives-"), "{name}");
    assert!(run.paths.markdown.exists());
}

#[tokio::test]
async fn test_run_suggest_on_minimal_report() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    std::fs::create_dir_all(&settings.reporting.reports_dir).unwrap();
    let report_path = settings
        .reporting
        .reports_dir
        .join("link-check-report-2024-05-01T10-00-00.000Z.json");
    std::fs::write(
        &report_path,
        r#"{"problemLinks": [{"id": "x", "title": "Foo", "link": "https://foo.invalid"}]}"#,
    )
    .unwrap();

    let run = run_suggest(&settings, Some(&report_path))
        .await
        .expect("Suggest run should succeed")
        .expect("One problem link should produce suggestions");

    let entry = &run.report.results[0];
    assert!(entry.has_alternatives);
    let links: Vec<_> = entry.alternatives.iter().map(|s| s.link.as_str()).collect();
    assert_eq!(links, ["https://chat.example.com", "https://image.example.com"]);
    assert_eq!(run.report.original_report.timestamp, None);
}

#[tokio::test]
async fn test_run_suggest_without_report_is_noop() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());

    let run = run_suggest(&settings, None).await.expect("No report is not an error");

    assert!(run.is_none());
}

#[tokio::test]
async fn test_run_suggest_report_without_problems_is_noop() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    std::fs::create_dir_all(&settings.reporting.reports_dir).unwrap();
    let report_path = settings.reporting.reports_dir.join("clean.json");
    std::fs::write(&report_path, r#"{"problemLinks": []}"#).unwrap();

    let run = run_suggest(&settings, Some(&report_path)).await.unwrap();

    assert!(run.is_none());
}

#[tokio::test]
async fn test_run_suggest_unreadable_report_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    let report_path = temp_dir.path().join("garbage.json");
    std::fs::write(&report_path, "not json").unwrap();

    assert!(run_suggest(&settings, Some(&report_path)).await.is_err());
}

#[tokio::test]
async fn test_scheduled_run_reports_problems() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    let server = Server::run();
    mixed_store(&server, &settings);
    let notifier = RecordingNotifier::default();

    let outcome = run_scheduled(&settings, Arc::new(DisabledDriver), &notifier).await;

    assert!(outcome.error.is_none());
    assert!(outcome.check.is_some());
    assert!(outcome.suggestions.is_some());
    assert!(outcome.notified);
    assert_eq!(notifier.subjects(), ["[Link Checker] Found 2 problem links"]);
    let body = &notifier.sent.lock().unwrap()[0].1;
    assert!(body.contains("Gone Model"));
}

#[tokio::test]
async fn test_scheduled_run_success_notification_is_opt_in() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = with_dirs(test_settings(), temp_dir.path());
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/ok"))
            .times(2)
            .respond_with(status_code(200)),
    );
    write_store(
        &settings,
        &[Resource::new("ok", "Working", server.url_str("/ok"), None)],
    );

    let quiet = RecordingNotifier::default();
    let outcome = run_scheduled(&settings, Arc::new(DisabledDriver), &quiet).await;
    assert!(outcome.suggestions.is_none());
    assert!(!outcome.notified);
    assert!(quiet.subjects().is_empty());

    let mut settings = settings;
    settings.notifications.email.send_on_success = true;
    let notifier = RecordingNotifier::default();
    let outcome = run_scheduled(&settings, Arc::new(DisabledDriver), &notifier).await;
    assert!(outcome.notified);
    assert_eq!(
        notifier.subjects(),
        ["[Link Checker] Check complete - all links are valid"]
    );
}

#[tokio::test]
async fn test_scheduled_run_notifies_on_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut settings = with_dirs(test_settings(), temp_dir.path());
    settings.link_checker.special_sites.insert(
        "broken".to_string(),
        SpecialSiteSettings {
            domain_pattern: "[".to_string(),
            ..SpecialSiteSettings::default()
        },
    );
    let notifier = RecordingNotifier::default();

    let outcome = run_scheduled(&settings, Arc::new(DisabledDriver), &notifier).await;

    assert!(outcome.check.is_none());
    let chain = outcome.error.expect("error should be recorded");
    assert!(chain.contains("broken"), "{chain}");
    assert_eq!(notifier.subjects(), ["[Link Checker] Error during link check"]);
}

#[tokio::test]
async fn test_scheduled_run_rotates_old_logs() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut settings = with_dirs(test_settings(), temp_dir.path());
    settings.logging.log_retention_days = 0;
    std::fs::create_dir_all(&settings.logging.logs_dir).unwrap();
    let old_log = settings.logging.logs_dir.join("link-check-2020-01-01.log");
    std::fs::write(&old_log, "old").unwrap();
    let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3 * 24 * 60 * 60);
    std::fs::File::options()
        .write(true)
        .open(&old_log)
        .unwrap()
        .set_modified(old)
        .unwrap();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/ok")).respond_with(status_code(200)),
    );
    write_store(
        &settings,
        &[Resource::new("ok", "Working", server.url_str("/ok"), None)],
    );

    let outcome =
        run_scheduled(&settings, Arc::new(DisabledDriver), &RecordingNotifier::default()).await;

    assert_eq!(outcome.logs_removed, 1);
    assert!(!old_log.exists());
}
